use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use serde::Deserialize;

use crate::domain::traits::RequestStream;
use crate::domain::{Error, Request};

/// Reads a scripted session: one `op,input` row per request.
pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Result<Self, Error> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Ok(Self { reader: Some(rdr) })
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    op: String,
    input: Option<String>,
}

impl TryFrom<CsvRow> for Request {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let op = row.op.trim().to_ascii_lowercase();
        // A blank input cell means no input at all.
        let input = row.input.filter(|value| !value.is_empty());
        match (op.as_str(), input) {
            ("login", Some(digits)) => Ok(Request::Login { digits }),
            ("withdraw", Some(digits)) => Ok(Request::Withdraw { digits }),
            ("pin_step", Some(digits)) => Ok(Request::PinChangeStep { digits }),
            ("logout", None) => Ok(Request::Logout),
            ("balance", None) => Ok(Request::Balance),
            ("change_pin", None) => Ok(Request::BeginPinChange),
            ("transactions", None) => Ok(Request::Transactions),
            ("reset", None) => Ok(Request::Reset),
            ("login" | "withdraw" | "pin_step", None) => {
                Err(Error::Ingestion(format!("{op} needs an input value")))
            }
            ("logout" | "balance" | "change_pin" | "transactions" | "reset", Some(_)) => {
                Err(Error::Ingestion(format!("{op} takes no input value")))
            }
            (other, _) => Err(Error::Ingestion(format!("unknown operation: {other}"))),
        }
    }
}

impl<R: Read + Send + 'static> RequestStream for CsvReader<R> {
    type ReqStream = Pin<Box<dyn Stream<Item = Result<Request, Error>> + Send>>;

    fn stream(&mut self) -> Self::ReqStream {
        // Take ownership of the reader so the iterator we build owns all data and is 'static.
        let reader = match self.reader.take() {
            Some(r) => r,
            None => {
                // Already consumed; return an empty stream.
                return Box::pin(stream::iter(Vec::<Result<Request, Error>>::new()));
            }
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Request::try_from(row),
                Err(e) => Err(Error::Ingestion(format!("unreadable row: {e}"))),
            });

        Box::pin(stream::iter(iter))
    }
}
