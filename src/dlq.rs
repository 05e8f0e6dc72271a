use crate::domain::{DeadLetterQueue, Error};

/// Script rows that never became a request are reported here and skipped,
/// so one bad row does not end the session.
#[derive(Default, Debug)]
pub struct StdErrDLQ {}

impl DeadLetterQueue for StdErrDLQ {
    fn report(&self, error: &Error) {
        eprintln!("dead letter: {error}");
    }
}
