use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::money;

const DESCRIPTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Withdrawal,
    PinChange,
    Login,
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Withdrawal => write!(f, "Withdrawal"),
            Self::PinChange => write!(f, "PIN change"),
            Self::Login => write!(f, "Login"),
        }
    }
}

/// One immutable ledger entry.
///
/// `seq` is assigned by the ledger at append time and makes the ordering
/// explicit even when two entries share a timestamp. `formatted` is the
/// human-readable line frozen at the moment the transaction happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Option<Decimal>,
    pub balance_after: Decimal,
    pub formatted: String,
}

impl TransactionRecord {
    /// Stamp a record for an operation that just succeeded.
    pub fn new(kind: TransactionKind, amount: Option<Decimal>, balance_after: Decimal) -> Self {
        let timestamp = Utc::now();
        let what = match amount {
            Some(amount) => format!("{kind} {}", money::gbp(amount)),
            None => kind.to_string(),
        };
        let formatted = format!(
            "{} | {} | Balance {}",
            timestamp.format(DESCRIPTION_TIME_FORMAT),
            what,
            money::gbp(balance_after),
        );
        Self {
            seq: 0,
            timestamp,
            kind,
            amount,
            balance_after,
            formatted,
        }
    }
}

impl core::fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.formatted)
    }
}
