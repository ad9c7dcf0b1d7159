//! Run tracking.
//!
//! Training and prediction runs log structured events (run start, dataset
//! sizes, per-card progress, completion) to a session. The JSONL session
//! appends one JSON object per line so runs can be compared or fed into an
//! external experiment tracker later; the null session discards everything.

use crate::error::{Error, Result};
use chrono::Utc;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

/// Metadata identifying one tracked run.
#[derive(Debug, Clone)]
pub struct RunInfo {
    /// Project the run belongs to.
    pub project: String,
    /// Run name, unique per invocation.
    pub name: String,
    /// Optional free-form comment.
    pub comment: Option<String>,
}

/// Sink for run events.
pub trait TrackingSession {
    /// Record one event with a JSON payload.
    fn log(&mut self, event: &str, payload: Value) -> Result<()>;

    /// Mark the run finished and flush any buffered records.
    fn finish(&mut self) -> Result<()>;
}

/// Session that discards all events.
#[derive(Debug, Default)]
pub struct NullSession;

impl TrackingSession for NullSession {
    fn log(&mut self, _event: &str, _payload: Value) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Session appending one JSON record per line to a file.
#[derive(Debug)]
pub struct JsonlSession {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonlSession {
    /// Create the log file and write the `run_start` record.
    pub fn create(path: &Path, run: &RunInfo) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::TrackingWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let file = File::create(path).map_err(|e| Error::TrackingWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut session = Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        };
        session.log(
            "run_start",
            serde_json::json!({
                "project": run.project,
                "name": run.name,
                "comment": run.comment,
            }),
        )?;
        Ok(session)
    }
}

impl TrackingSession for JsonlSession {
    fn log(&mut self, event: &str, payload: Value) -> Result<()> {
        let record = serde_json::json!({
            "ts": Utc::now().to_rfc3339(),
            "event": event,
            "data": payload,
        });
        let line =
            serde_json::to_string(&record).map_err(|e| Error::TrackingSerialize { source: e })?;
        writeln!(self.writer, "{line}").map_err(|e| Error::TrackingWrite {
            path: self.path.clone(),
            source: e,
        })
    }

    fn finish(&mut self) -> Result<()> {
        self.log("run_finish", Value::Null)?;
        self.writer.flush().map_err(|e| Error::TrackingWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}
