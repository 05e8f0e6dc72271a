pub mod account;
pub mod error;
pub mod money;
pub mod request;
pub mod session;
pub mod traits;
pub mod transaction;

pub use account::Account;
pub use error::Error;
pub use request::{Outcome, PinChangeAbort, Request, StepResult};
pub use session::{Mode, PinChangeStep, Role, Session};
pub use traits::{DeadLetterQueue, LedgerStore, RequestStream};
pub use transaction::{TransactionKind, TransactionRecord};
