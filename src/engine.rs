use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{
    Account, Error, LedgerStore, Mode, Outcome, PinChangeAbort, PinChangeStep, Request, Role,
    Session, StepResult, TransactionKind, TransactionRecord, account, money,
};

/// The machine core: one account, one session, one ledger. Requests are
/// handled strictly one at a time; `&mut self` is the critical section.
///
/// Anything that must survive a restart goes through the ledger before the
/// in-memory state moves, so an acknowledged outcome is always on disk.
pub struct Engine<L: LedgerStore> {
    config: Config,
    account: Account,
    session: Session,
    ledger: L,
}

impl<L: LedgerStore> Engine<L> {
    pub fn new(config: Config, ledger: L) -> Self {
        let account = Account::new(config.pin.clone(), config.starting_balance);
        Self {
            config,
            account,
            session: Session::new(),
            ledger,
        }
    }

    /// Handle one request end to end: admission by session mode, domain
    /// validation, durable append, then the in-memory mutation.
    pub fn handle(&mut self, request: Request) -> Result<Outcome, Error> {
        match request {
            Request::Login { digits } => self.login(&digits),
            Request::Logout => Ok(self.logout()),
            Request::Balance => self.balance(),
            Request::Withdraw { digits } => self.withdraw(&digits),
            Request::BeginPinChange => self.begin_pin_change(),
            Request::PinChangeStep { digits } => self.pin_change_step(&digits),
            Request::Transactions => self.transactions(),
            Request::Reset => self.reset_all_data(),
        }
    }

    /// Replace any stale buffer contents with this request's keys, then
    /// drain the buffer for evaluation, exactly as a keypad would.
    fn buffer_input(&mut self, digits: &str) -> Result<String, Error> {
        self.session.clear_input();
        for key in digits.chars() {
            self.session.submit_digit(key)?;
        }
        Ok(self.session.take_input())
    }

    fn login(&mut self, digits: &str) -> Result<Outcome, Error> {
        match self.session.mode() {
            Mode::Anonymous | Mode::Authenticating => {}
            _ => return Err(Error::InvalidState),
        }
        let attempt = self.buffer_input(digits)?;

        // The admin credential is checked before the customer PIN.
        let role = if attempt == self.config.admin_password {
            Some(Role::Admin)
        } else if self.account.pin_matches(&attempt) {
            Some(Role::Customer)
        } else {
            None
        };

        match role {
            Some(role) => {
                self.record(TransactionKind::Login, None, self.account.balance())?;
                self.session.enter(match role {
                    Role::Admin => Mode::Admin,
                    Role::Customer => Mode::Customer,
                });
                info!(?role, "login accepted");
                Ok(Outcome::LoggedIn { role })
            }
            None => {
                self.session.enter(Mode::Anonymous);
                warn!("login rejected");
                Err(Error::AuthFailed)
            }
        }
    }

    fn logout(&mut self) -> Outcome {
        self.session.logout();
        info!("logged out");
        Outcome::LoggedOut
    }

    fn balance(&self) -> Result<Outcome, Error> {
        self.require_customer()?;
        Ok(Outcome::Balance(self.account.balance()))
    }

    fn withdraw(&mut self, digits: &str) -> Result<Outcome, Error> {
        self.require_customer()?;
        let entered = self.buffer_input(digits)?;
        let amount = money::parse_amount(&entered)?;
        if amount % self.config.denomination != Decimal::ZERO {
            debug!(%amount, "withdrawal rejected, wrong denomination");
            return Err(Error::InvalidDenomination(self.config.denomination));
        }
        let balance = self.account.balance();
        if amount > balance {
            debug!(%amount, "withdrawal rejected, insufficient funds");
            return Err(Error::InsufficientFunds(balance));
        }

        let new_balance = money::to_pence(balance - amount);
        self.record(TransactionKind::Withdrawal, Some(amount), new_balance)?;
        self.account.debit(amount);
        info!(amount = %amount, balance = %new_balance, "cash dispensed");
        Ok(Outcome::Dispensed {
            amount,
            new_balance,
        })
    }

    fn begin_pin_change(&mut self) -> Result<Outcome, Error> {
        match self.session.mode() {
            Mode::Customer => {
                self.session
                    .enter(Mode::ChangingPin(PinChangeStep::VerifyCurrent));
                Ok(Outcome::PinChangeStarted)
            }
            Mode::ChangingPin(_) => Err(Error::InvalidState),
            _ => Err(Error::NotAuthenticated),
        }
    }

    fn pin_change_step(&mut self, digits: &str) -> Result<Outcome, Error> {
        let step = match self.session.mode() {
            Mode::ChangingPin(step) => step.clone(),
            _ => return Err(Error::InvalidState),
        };
        let entered = self.buffer_input(digits)?;

        let result = match step {
            PinChangeStep::VerifyCurrent => {
                if self.account.pin_matches(&entered) {
                    self.session.enter(Mode::ChangingPin(PinChangeStep::EnterNew));
                    StepResult::AwaitingNewPin
                } else {
                    self.session.enter(Mode::Customer);
                    StepResult::Aborted(PinChangeAbort::WrongCurrentPin)
                }
            }
            PinChangeStep::EnterNew => {
                if account::is_valid_pin(&entered) {
                    self.session.enter(Mode::ChangingPin(PinChangeStep::ConfirmNew {
                        candidate: entered,
                    }));
                    StepResult::AwaitingConfirmation
                } else {
                    self.session.enter(Mode::Customer);
                    StepResult::Aborted(PinChangeAbort::MalformedNewPin)
                }
            }
            PinChangeStep::ConfirmNew { candidate } => {
                if entered == candidate {
                    self.record(TransactionKind::PinChange, None, self.account.balance())?;
                    self.account.set_pin(candidate);
                    self.session.enter(Mode::Customer);
                    info!("pin changed");
                    StepResult::Committed
                } else {
                    self.session.enter(Mode::Customer);
                    StepResult::Aborted(PinChangeAbort::ConfirmationMismatch)
                }
            }
        };

        if let StepResult::Aborted(reason) = result {
            debug!(?reason, "pin change aborted");
        }
        Ok(Outcome::PinChange(result))
    }

    fn transactions(&self) -> Result<Outcome, Error> {
        match self.session.mode() {
            Mode::Customer | Mode::Admin => {
                Ok(Outcome::Transactions(self.ledger.read_all().to_vec()))
            }
            Mode::ChangingPin(_) => Err(Error::InvalidState),
            _ => Err(Error::NotAuthenticated),
        }
    }

    /// Wipe everything back to the configured starting state. Only exposed
    /// when the process runs in maintenance mode.
    fn reset_all_data(&mut self) -> Result<Outcome, Error> {
        if !self.config.maintenance {
            warn!("reset denied, maintenance mode is off");
            return Err(Error::NotAuthenticated);
        }
        self.ledger.clear()?;
        self.account = Account::new(self.config.pin.clone(), self.config.starting_balance);
        self.session.logout();
        warn!("all data reset");
        Ok(Outcome::DataReset)
    }

    fn require_customer(&self) -> Result<(), Error> {
        match self.session.mode() {
            Mode::Customer => Ok(()),
            Mode::ChangingPin(_) => Err(Error::InvalidState),
            _ => Err(Error::NotAuthenticated),
        }
    }

    fn record(
        &mut self,
        kind: TransactionKind,
        amount: Option<Decimal>,
        balance_after: Decimal,
    ) -> Result<(), Error> {
        self.ledger.append(TransactionRecord::new(kind, amount, balance_after))
    }
}
