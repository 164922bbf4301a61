//! JSONL file sink for audit records.
//!
//! Each [`AuditRecord`] is serialized as a single JSON line and appended to
//! `audit_log_YYYYMMDD.jsonl` for the record's UTC date. Every write is
//! flushed and synced before it is acknowledged.
//!
//! A write that reached the file but failed to sync is retried under the same
//! record id, so a file may hold the same record twice; `query` keeps the
//! first line for each id.

use archivist_application::{AuditError, AuditSink};
use archivist_domain::{AuditFilter, AuditRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

const FILE_PREFIX: &str = "audit_log_";
const FILE_SUFFIX: &str = ".jsonl";

struct OpenLog {
    date: NaiveDate,
    writer: BufWriter<File>,
}

/// Append-only audit sink writing one file per day.
///
/// Thread-safe via `Mutex`; the writer for the current day stays open
/// between records.
pub struct JsonlAuditSink {
    dir: PathBuf,
    current: Mutex<Option<OpenLog>>,
}

impl JsonlAuditSink {
    /// Create a sink writing under `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, AuditError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            AuditError::Unavailable(format!(
                "could not create audit directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            current: Mutex::new(None),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding records for the given day
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", FILE_PREFIX, date.format("%Y%m%d"), FILE_SUFFIX))
    }

    fn open(&self, date: NaiveDate) -> Result<OpenLog, AuditError> {
        let path = self.path_for(date);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                AuditError::Unavailable(format!("could not open {}: {}", path.display(), e))
            })?;
        debug!(path = %path.display(), "opened audit log");
        Ok(OpenLog {
            date,
            writer: BufWriter::new(file),
        })
    }

    fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let line =
            serde_json::to_string(record).map_err(|e| AuditError::Encoding(e.to_string()))?;
        let date = record.timestamp.date_naive();

        let mut current = self
            .current
            .lock()
            .map_err(|_| AuditError::Unavailable("audit writer lock poisoned".to_string()))?;

        if current.as_ref().is_none_or(|log| log.date != date) {
            *current = Some(self.open(date)?);
        }
        let Some(log) = current.as_mut() else {
            return Err(AuditError::Unavailable("audit log not open".to_string()));
        };

        let result = writeln!(log.writer, "{}", line)
            .and_then(|_| log.writer.flush())
            .and_then(|_| log.writer.get_ref().sync_data());
        if let Err(e) = result {
            // Reopen on the next write rather than reuse a writer in an unknown state
            *current = None;
            return Err(AuditError::Write(e.to_string()));
        }
        Ok(())
    }

    fn log_files(&self) -> Result<Vec<PathBuf>, AuditError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| AuditError::Read(e.to_string()))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(FILE_PREFIX) && n.ends_with(FILE_SUFFIX))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn read_file(path: &Path, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        let file = File::open(path).map_err(|e| AuditError::Read(e.to_string()))?;
        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| AuditError::Read(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditRecord>(&line) {
                Ok(record) if filter.matches(&record) => records.push(record),
                Ok(_) => {}
                Err(e) => warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping unreadable audit line"
                ),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.append(record)
    }

    async fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for path in self.log_files()? {
            for record in Self::read_file(&path, filter)? {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                }
            }
        }
        Ok(records)
    }
}
