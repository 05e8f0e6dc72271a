use std::fmt;

use rust_decimal::Decimal;

use crate::domain::money;

/// The machine serves a single account: one balance, one PIN.
///
/// Fields are private so the only paths to the balance are the validated
/// operations, and the PIN can only be compared or replaced, never read.
pub struct Account {
    pin: String,
    balance: Decimal,
}

impl Account {
    pub fn new(pin: String, starting_balance: Decimal) -> Self {
        Self {
            pin,
            balance: money::to_pence(starting_balance),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn pin_matches(&self, entered: &str) -> bool {
        self.pin == entered
    }

    /// Commit a withdrawal. Callers have already checked sufficiency.
    pub fn debit(&mut self, amount: Decimal) -> Decimal {
        debug_assert!(amount <= self.balance);
        self.balance = money::to_pence(self.balance - amount);
        self.balance
    }

    pub fn set_pin(&mut self, new_pin: String) {
        debug_assert!(is_valid_pin(&new_pin));
        self.pin = new_pin;
    }
}

/// A PIN is exactly four ASCII digits.
pub fn is_valid_pin(digits: &str) -> bool {
    digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit())
}

// The PIN must never reach logs or error output, Debug included.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("pin", &"****")
            .field("balance", &self.balance)
            .finish()
    }
}
