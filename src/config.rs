use std::env;
use std::fmt;
use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::domain::{Error, account, money};

/// Deployment knobs: credentials, balances and the ledger location belong
/// to the operator, not the ledger.
pub struct Config {
    pub pin: String,
    pub admin_password: String,
    pub starting_balance: Decimal,
    pub denomination: Decimal,
    pub ledger_path: PathBuf,
    pub maintenance: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pin: "1234".to_string(),
            admin_password: "4321".to_string(),
            starting_balance: Decimal::new(12345, 2),
            denomination: Decimal::new(10, 0),
            ledger_path: PathBuf::from("data/transactions.json"),
            maintenance: false,
        }
    }
}

impl Config {
    /// Defaults overridden by `ATM_*` environment variables, then validated.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Config::default();
        if let Ok(pin) = env::var("ATM_PIN") {
            config.pin = pin;
        }
        if let Ok(password) = env::var("ATM_ADMIN_PASSWORD") {
            config.admin_password = password;
        }
        if let Ok(balance) = env::var("ATM_STARTING_BALANCE") {
            config.starting_balance = parse_amount_var("ATM_STARTING_BALANCE", &balance)?;
        }
        if let Ok(unit) = env::var("ATM_DENOMINATION") {
            config.denomination = parse_amount_var("ATM_DENOMINATION", &unit)?;
        }
        if let Ok(path) = env::var("ATM_LEDGER_FILE") {
            config.ledger_path = PathBuf::from(path);
        }
        if let Ok(flag) = env::var("ATM_MAINTENANCE") {
            config.maintenance = matches!(flag.trim(), "1" | "true" | "yes");
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if !account::is_valid_pin(&self.pin) {
            return Err(Error::Config("PIN must be exactly 4 digits".to_string()));
        }
        if self.admin_password.is_empty() {
            return Err(Error::Config("admin password must not be empty".to_string()));
        }
        if self.admin_password == self.pin {
            return Err(Error::Config(
                "admin password must differ from the customer PIN".to_string(),
            ));
        }
        if self.starting_balance < Decimal::ZERO || self.starting_balance.scale() > money::SCALE {
            return Err(Error::Config(
                "starting balance must be a non-negative two-decimal amount".to_string(),
            ));
        }
        if self.denomination <= Decimal::ZERO {
            return Err(Error::Config("denomination must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_amount_var(key: &str, value: &str) -> Result<Decimal, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} is not a valid amount")))
}

// Credentials stay out of Debug output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("pin", &"****")
            .field("admin_password", &"****")
            .field("starting_balance", &self.starting_balance)
            .field("denomination", &self.denomination)
            .field("ledger_path", &self.ledger_path)
            .field("maintenance", &self.maintenance)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_demo_machine() {
        let config = Config::default();
        assert_eq!(config.pin, "1234");
        assert_eq!(config.admin_password, "4321");
        assert_eq!(config.starting_balance, Decimal::new(12345, 2));
        assert_eq!(config.denomination, Decimal::new(10, 0));
        assert!(!config.maintenance);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_a_malformed_pin() {
        let config = Config {
            pin: "12".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_identical_credentials() {
        let config = Config {
            pin: "4321".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_a_negative_starting_balance() {
        let config = Config {
            starting_balance: Decimal::new(-1, 2),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_a_zero_denomination() {
        let config = Config {
            denomination: Decimal::ZERO,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn debug_redacts_both_credentials() {
        let rendered = format!("{:?}", Config::default());
        assert!(!rendered.contains("1234"));
        assert!(!rendered.contains("4321"));
    }
}
