use rust_decimal::Decimal;

/// Every rejection the engine can hand back to a caller.
///
/// Display texts double as the customer-facing messages, so they never
/// carry PINs, passwords or keyed-in input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not authorized")]
    NotAuthenticated,

    #[error("Incorrect PIN or password. Please try again.")]
    AuthFailed,

    #[error("That operation is not available right now.")]
    InvalidState,

    #[error("Please enter a valid number.")]
    MalformedAmount,

    #[error("Please enter an amount in multiples of £{0}.")]
    InvalidDenomination(Decimal),

    #[error("Insufficient funds. Your balance is £{0}")]
    InsufficientFunds(Decimal),

    #[error("Transaction log write failed: {0}")]
    Persistence(String),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
