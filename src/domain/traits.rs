use futures::Stream;

use crate::domain::{Error, Request, TransactionRecord};

/// Source of inbound requests, one scripted session at a time.
pub trait RequestStream {
    type ReqStream: Stream<Item = Result<Request, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::ReqStream;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}

/// Append-only durable transaction history.
///
/// `append` assigns the record's sequence number and must make the record
/// durable before returning: once acknowledged it survives a restart.
/// `read_all` yields records in append order.
pub trait LedgerStore {
    fn append(&mut self, record: TransactionRecord) -> Result<(), Error>;

    fn read_all(&self) -> &[TransactionRecord];

    /// Maintenance wipe. Durable like `append`.
    fn clear(&mut self) -> Result<(), Error>;
}
