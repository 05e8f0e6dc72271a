use std::fmt;
use std::mem;

use crate::domain::Error;

/// Which credential a successful login matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Admin,
}

/// The ordered steps of the PIN-change flow. The candidate PIN lives only
/// here while awaiting confirmation; it is discarded on any exit.
#[derive(Clone, PartialEq, Eq)]
pub enum PinChangeStep {
    VerifyCurrent,
    EnterNew,
    ConfirmNew { candidate: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Anonymous,
    Authenticating,
    Customer,
    Admin,
    ChangingPin(PinChangeStep),
}

/// Session state: the current mode plus the keyed-in input buffer.
///
/// All transitions funnel through [`Session::enter`], which wipes the
/// buffer, so digits never leak from one mode into the next.
#[derive(Default)]
pub struct Session {
    mode: Mode,
    input: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Buffer one key press. The first key in `Anonymous` starts
    /// authentication; `Admin` has no input-collecting screens.
    pub fn submit_digit(&mut self, key: char) -> Result<(), Error> {
        match self.mode {
            Mode::Anonymous => {
                self.mode = Mode::Authenticating;
                self.input.push(key);
                Ok(())
            }
            Mode::Authenticating | Mode::Customer | Mode::ChangingPin(_) => {
                self.input.push(key);
                Ok(())
            }
            Mode::Admin => Err(Error::InvalidState),
        }
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Drain the buffer for evaluation at a confirm point.
    pub fn take_input(&mut self) -> String {
        mem::take(&mut self.input)
    }

    /// The single transition point. Whatever was keyed in stays behind.
    pub fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        self.input.clear();
    }

    pub fn logout(&mut self) {
        self.enter(Mode::Anonymous);
    }
}

// Candidate PINs never appear in Debug output.
impl fmt::Debug for PinChangeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerifyCurrent => write!(f, "VerifyCurrent"),
            Self::EnterNew => write!(f, "EnterNew"),
            Self::ConfirmNew { .. } => f
                .debug_struct("ConfirmNew")
                .field("candidate", &"****")
                .finish(),
        }
    }
}

// Buffered digits may be a PIN mid-entry; show only how many there are.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("input", &format_args!("<{} keys>", self.input.len()))
            .finish()
    }
}
