use rust_decimal::Decimal;

use crate::domain::money;
use crate::domain::session::Role;
use crate::domain::transaction::TransactionRecord;

/// One logical operation arriving over the transport, already shaped but
/// not yet validated against session or account state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Login { digits: String },
    Logout,
    Balance,
    Withdraw { digits: String },
    BeginPinChange,
    PinChangeStep { digits: String },
    Transactions,
    Reset,
}

/// What a handled request produced. `Display` is the customer-facing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    LoggedIn { role: Role },
    LoggedOut,
    Balance(Decimal),
    Dispensed { amount: Decimal, new_balance: Decimal },
    PinChangeStarted,
    PinChange(StepResult),
    Transactions(Vec<TransactionRecord>),
    DataReset,
}

/// Where one PIN-change submission left the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    AwaitingNewPin,
    AwaitingConfirmation,
    Aborted(PinChangeAbort),
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinChangeAbort {
    WrongCurrentPin,
    MalformedNewPin,
    ConfirmationMismatch,
}

impl core::fmt::Display for PinChangeAbort {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WrongCurrentPin => write!(f, "Incorrect current PIN."),
            Self::MalformedNewPin => write!(f, "PIN must be exactly 4 digits."),
            Self::ConfirmationMismatch => write!(f, "PINs do not match."),
        }
    }
}

impl core::fmt::Display for Outcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Outcome::LoggedIn { role: Role::Admin } => write!(f, "Admin login successful!"),
            Outcome::LoggedIn { role: Role::Customer } => write!(f, "Login successful!"),
            Outcome::LoggedOut => write!(f, "Thank you for using Secure Bank ATM!"),
            Outcome::Balance(balance) => write!(f, "Balance: {}", money::gbp(*balance)),
            Outcome::Dispensed {
                amount,
                new_balance,
            } => write!(
                f,
                "Success! {} withdrawn. Balance: {}",
                money::gbp(*amount),
                money::gbp(*new_balance)
            ),
            Outcome::PinChangeStarted => write!(f, "Enter your current PIN."),
            Outcome::PinChange(step) => match step {
                StepResult::AwaitingNewPin => write!(f, "Current PIN verified. Enter new PIN."),
                StepResult::AwaitingConfirmation => write!(f, "New PIN entered. Please confirm."),
                StepResult::Committed => write!(f, "PIN changed successfully!"),
                StepResult::Aborted(reason) => write!(f, "{reason} PIN change cancelled."),
            },
            Outcome::Transactions(records) => {
                write!(f, "{} transaction(s) on record", records.len())?;
                for record in records {
                    write!(f, "\n{record}")?;
                }
                Ok(())
            }
            Outcome::DataReset => write!(f, "All data reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionKind;

    #[test]
    fn login_messages_distinguish_roles() {
        let customer = Outcome::LoggedIn {
            role: Role::Customer,
        };
        let admin = Outcome::LoggedIn { role: Role::Admin };
        assert_eq!(customer.to_string(), "Login successful!");
        assert_eq!(admin.to_string(), "Admin login successful!");
    }

    #[test]
    fn dispensed_message_names_amount_and_balance() {
        let outcome = Outcome::Dispensed {
            amount: Decimal::new(2000, 2),
            new_balance: Decimal::new(10345, 2),
        };
        assert_eq!(
            outcome.to_string(),
            "Success! £20.00 withdrawn. Balance: £103.45"
        );
    }

    #[test]
    fn each_abort_reason_reads_differently() {
        let texts: Vec<String> = [
            PinChangeAbort::WrongCurrentPin,
            PinChangeAbort::MalformedNewPin,
            PinChangeAbort::ConfirmationMismatch,
        ]
        .iter()
        .map(|reason| Outcome::PinChange(StepResult::Aborted(*reason)).to_string())
        .collect();
        assert_eq!(texts[0], "Incorrect current PIN. PIN change cancelled.");
        assert_eq!(texts[1], "PIN must be exactly 4 digits. PIN change cancelled.");
        assert_eq!(texts[2], "PINs do not match. PIN change cancelled.");
    }

    #[test]
    fn transactions_list_counts_then_details() {
        let record = TransactionRecord::new(
            TransactionKind::Withdrawal,
            Some(Decimal::new(2000, 2)),
            Decimal::new(10345, 2),
        );
        let rendered = Outcome::Transactions(vec![record.clone()]).to_string();
        assert!(rendered.starts_with("1 transaction(s) on record\n"));
        assert!(rendered.ends_with(&record.formatted));

        assert_eq!(
            Outcome::Transactions(Vec::new()).to_string(),
            "0 transaction(s) on record"
        );
    }
}
