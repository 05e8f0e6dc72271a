use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{Error, LedgerStore, TransactionRecord};

/// Durable ledger: the full history lives in one JSON array on disk and is
/// mirrored in memory for reads.
///
/// Writes go flush-then-acknowledge. The in-memory mirror only keeps a
/// record once the file does, so the file is never behind what callers saw.
pub struct JsonFileLedger {
    path: PathBuf,
    records: Vec<TransactionRecord>,
}

impl JsonFileLedger {
    /// Load the existing history, or start empty when the file is absent.
    /// A file that exists but does not parse is an error: financial
    /// records are never silently discarded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let records = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::Persistence(format!("{} is not a valid ledger: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(persistence_error(&path, e)),
        };
        Ok(Self { path, records })
    }

    /// Write a sibling temp file, sync it, then rename it over the ledger
    /// so readers only ever see a complete array.
    fn persist(&self) -> Result<(), Error> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| persistence_error(&self.path, e))?;
        }
        let body = serde_json::to_vec_pretty(&self.records)
            .map_err(|e| Error::Persistence(format!("could not encode ledger: {e}")))?;
        let tmp = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp).map_err(|e| persistence_error(&tmp, e))?;
        file.write_all(&body).map_err(|e| persistence_error(&tmp, e))?;
        file.sync_all().map_err(|e| persistence_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| persistence_error(&self.path, e))
    }
}

fn persistence_error(path: &Path, e: std::io::Error) -> Error {
    Error::Persistence(format!("{}: {e}", path.display()))
}

impl LedgerStore for JsonFileLedger {
    fn append(&mut self, mut record: TransactionRecord) -> Result<(), Error> {
        record.seq = self.records.last().map_or(1, |last| last.seq + 1);
        self.records.push(record);
        if let Err(e) = self.persist() {
            // the mirror never gets ahead of the file
            self.records.pop();
            tracing::error!(path = %self.path.display(), error = %e, "ledger append failed");
            return Err(e);
        }
        Ok(())
    }

    fn read_all(&self) -> &[TransactionRecord] {
        &self.records
    }

    fn clear(&mut self) -> Result<(), Error> {
        let wiped = std::mem::take(&mut self.records);
        if let Err(e) = self.persist() {
            self.records = wiped;
            return Err(e);
        }
        Ok(())
    }
}

/// In-memory stand-in for engine tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryLedger {
    records: Vec<TransactionRecord>,
}

#[cfg(test)]
impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl LedgerStore for MemoryLedger {
    fn append(&mut self, mut record: TransactionRecord) -> Result<(), Error> {
        record.seq = self.records.last().map_or(1, |last| last.seq + 1);
        self.records.push(record);
        Ok(())
    }

    fn read_all(&self) -> &[TransactionRecord] {
        &self.records
    }

    fn clear(&mut self) -> Result<(), Error> {
        self.records.clear();
        Ok(())
    }
}

/// Fails every append after an allowed number of successful ones.
#[cfg(test)]
pub struct FlakyLedger {
    inner: MemoryLedger,
    appends_left: usize,
}

#[cfg(test)]
impl FlakyLedger {
    pub fn failing_after(successful_appends: usize) -> Self {
        Self {
            inner: MemoryLedger::new(),
            appends_left: successful_appends,
        }
    }
}

#[cfg(test)]
impl LedgerStore for FlakyLedger {
    fn append(&mut self, record: TransactionRecord) -> Result<(), Error> {
        if self.appends_left == 0 {
            return Err(Error::Persistence("injected fault".to_string()));
        }
        self.appends_left -= 1;
        self.inner.append(record)
    }

    fn read_all(&self) -> &[TransactionRecord] {
        self.inner.read_all()
    }

    fn clear(&mut self) -> Result<(), Error> {
        self.inner.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionKind;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn withdrawal(pounds: i64, balance_after: i64) -> TransactionRecord {
        TransactionRecord::new(
            TransactionKind::Withdrawal,
            Some(Decimal::new(pounds * 100, 2)),
            Decimal::new(balance_after * 100, 2),
        )
    }

    #[test]
    fn opens_empty_when_no_file_exists() {
        let dir = tempdir().unwrap();
        let ledger = JsonFileLedger::open(dir.path().join("transactions.json")).unwrap();
        assert!(ledger.read_all().is_empty());
    }

    #[test]
    fn appended_records_survive_a_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("transactions.json");

        let mut ledger = JsonFileLedger::open(&path).unwrap();
        ledger
            .append(TransactionRecord::new(
                TransactionKind::Login,
                None,
                Decimal::new(12345, 2),
            ))
            .unwrap();
        ledger.append(withdrawal(20, 103)).unwrap();
        let before = ledger.read_all().to_vec();

        let reopened = JsonFileLedger::open(&path).unwrap();
        assert_eq!(reopened.read_all(), before.as_slice());
    }

    #[test]
    fn append_assigns_increasing_sequence_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.json");

        let mut ledger = JsonFileLedger::open(&path).unwrap();
        ledger.append(withdrawal(10, 110)).unwrap();
        ledger.append(withdrawal(20, 90)).unwrap();
        assert_eq!(ledger.read_all()[0].seq, 1);
        assert_eq!(ledger.read_all()[1].seq, 2);

        // numbering continues across restarts
        let mut reopened = JsonFileLedger::open(&path).unwrap();
        reopened.append(withdrawal(30, 60)).unwrap();
        assert_eq!(reopened.read_all()[2].seq, 3);
    }

    #[test]
    fn clear_wipes_the_file_too() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.json");

        let mut ledger = JsonFileLedger::open(&path).unwrap();
        ledger.append(withdrawal(10, 110)).unwrap();
        ledger.clear().unwrap();
        assert!(ledger.read_all().is_empty());

        let reopened = JsonFileLedger::open(&path).unwrap();
        assert!(reopened.read_all().is_empty());
    }

    #[test]
    fn a_corrupt_file_is_an_error_not_an_empty_ledger() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        std::fs::write(&path, b"{ not a ledger").unwrap();

        assert!(matches!(
            JsonFileLedger::open(&path),
            Err(Error::Persistence(_))
        ));
    }

    #[test]
    fn the_file_is_human_readable_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions.json");

        let mut ledger = JsonFileLedger::open(&path).unwrap();
        ledger.append(withdrawal(20, 100)).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("\"type\": \"withdrawal\""));
        assert!(body.contains("\"amount\": \"20.00\""));
    }
}
