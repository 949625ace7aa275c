use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;

use super::domain::ApplicationRecord;

/// Append-only log of scoring decisions, queryable by applicant identity.
///
/// Records are immutable once written; there is no update or delete path.
/// Implementations must keep concurrent appends from corrupting the log and
/// must return an applicant's records in insertion order.
pub trait ApplicationStore: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<(), StoreError>;

    /// All records for the applicant in insertion order; an empty vec when
    /// none exist, never an error.
    fn for_applicant(&self, applicant_id: &str) -> Result<Vec<ApplicationRecord>, StoreError>;
}

/// Storage-layer failure. Surfaced to the caller but never allowed to crash
/// the request handler.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage io failure: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

/// Durable store backed by a JSON-lines file, one record per line.
///
/// The append medium is inherently order-preserving; a single writer lock
/// serializes appends and keeps reads from observing a torn line.
pub struct JsonlStore {
    path: PathBuf,
    writer: Mutex<File>,
}

impl JsonlStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        info!(path = %path.display(), "application store opened");
        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<ApplicationRecord>, StoreError> {
        let raw = std::fs::read_to_string(&self.path)?;
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|err| StoreError::Corrupt(format!("{err} in line '{line}'")))
            })
            .collect()
    }
}

impl ApplicationStore for JsonlStore {
    fn insert(&self, record: ApplicationRecord) -> Result<(), StoreError> {
        let line = serde_json::to_string(&record)
            .map_err(|err| StoreError::Corrupt(err.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::Unavailable("store writer lock poisoned".to_string()))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn for_applicant(&self, applicant_id: &str) -> Result<Vec<ApplicationRecord>, StoreError> {
        // Hold the writer lock so a concurrent append cannot be observed
        // half-written.
        let _writer = self
            .writer
            .lock()
            .map_err(|_| StoreError::Unavailable("store writer lock poisoned".to_string()))?;

        Ok(self
            .read_all()?
            .into_iter()
            .filter(|record| record.applicant_id == applicant_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{ApplicationStatus, LoanRequest};
    use chrono::Utc;

    fn record(applicant_id: &str, loan_amount: f64) -> ApplicationRecord {
        let request = LoanRequest {
            applicant_id: applicant_id.to_string(),
            income: 60000.0,
            credit_score: 700,
            loan_amount,
            loan_term: 5,
            debt_to_income: 0.3,
        };
        ApplicationRecord::from_decision(
            &request,
            ApplicationStatus::Approved,
            0.8,
            350.0,
            Utc::now(),
        )
    }

    #[test]
    fn appends_and_reads_back_in_insertion_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonlStore::open(dir.path().join("applications.jsonl")).expect("store opens");

        store.insert(record("alice", 1000.0)).expect("first insert");
        store.insert(record("bob", 2000.0)).expect("second insert");
        store.insert(record("alice", 3000.0)).expect("third insert");

        let records = store.for_applicant("alice").expect("query succeeds");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].loan_amount, 1000.0);
        assert_eq!(records[1].loan_amount, 3000.0);
    }

    #[test]
    fn unknown_applicant_yields_empty_not_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonlStore::open(dir.path().join("applications.jsonl")).expect("store opens");
        let records = store.for_applicant("nobody").expect("query succeeds");
        assert!(records.is_empty());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("applications.jsonl");

        {
            let store = JsonlStore::open(&path).expect("store opens");
            store.insert(record("carol", 5000.0)).expect("insert");
        }

        let reopened = JsonlStore::open(&path).expect("store reopens");
        let records = reopened.for_applicant("carol").expect("query succeeds");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, ApplicationStatus::Approved);
    }

    #[test]
    fn corrupt_lines_surface_as_store_errors() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("applications.jsonl");
        std::fs::write(&path, "not json\n").expect("seed file");

        let store = JsonlStore::open(&path).expect("store opens");
        match store.for_applicant("anyone") {
            Err(StoreError::Corrupt(_)) => {}
            other => panic!("expected corrupt-store error, got {other:?}"),
        }
    }
}
