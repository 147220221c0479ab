//! Audit trail of a relocation run.
//!
//! A run writes three append-only logs:
//!
//! - `general.log`: every operation, including failures and processed entries
//! - `error.log`: failures only
//! - `processed.log`: one JSON line per entry whose primary asset was moved
//!
//! Components receive a `&dyn RunLog` instead of reaching for global state.
//! Lines are mirrored to the `log` facade at debug level.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const GENERAL_LOG: &str = "general.log";
pub const ERROR_LOG: &str = "error.log";
pub const PROCESSED_LOG: &str = "processed.log";

pub trait RunLog {
    fn info(&self, message: &str);

    fn error(&self, message: &str);

    /// Record an entry whose primary asset was relocated
    fn processed(&self, record: &str);

    fn flush(&self) {}
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S,%3f").to_string()
}

/// Append-only log files in one directory
pub struct FileRunLog {
    dir: PathBuf,
    general: File,
    errors: File,
    processed: File,
}

impl FileRunLog {
    /// Open (creating if needed) the three log files inside `dir`
    pub fn open<P: AsRef<Path>>(dir: P) -> std::io::Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let open = |name: &str| OpenOptions::new().create(true).append(true).open(dir.join(name));

        Ok(Self {
            dir: dir.to_path_buf(),
            general: open(GENERAL_LOG)?,
            errors: open(ERROR_LOG)?,
            processed: open(PROCESSED_LOG)?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn append(mut file: &File, line: &str) {
        if let Err(e) = writeln!(file, "{}", line) {
            log::warn!("Failed to write log line: {}", e);
        }
    }
}

impl RunLog for FileRunLog {
    fn info(&self, message: &str) {
        log::debug!("{}", message);
        Self::append(&self.general, &format!("{} - INFO - {}", timestamp(), message));
    }

    fn error(&self, message: &str) {
        log::debug!("error: {}", message);
        let line = format!("{} - ERROR - {}", timestamp(), message);
        Self::append(&self.general, &line);
        Self::append(&self.errors, &line);
    }

    fn processed(&self, record: &str) {
        let ts = timestamp();
        Self::append(&self.general, &format!("{} - INFO - {}", ts, record));
        Self::append(&self.processed, &format!("{} - {}", ts, record));
    }

    fn flush(&self) {
        for mut file in [&self.general, &self.errors, &self.processed] {
            if let Err(e) = file.flush() {
                log::warn!("Failed to flush log file: {}", e);
            }
        }
    }
}

/// Which log a captured line went to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Error,
    Processed,
}

/// Captures log lines in memory, for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryRunLog {
    lines: Mutex<Vec<(LogKind, String)>>,
}

impl MemoryRunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogKind, String)> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn of_kind(&self, kind: LogKind) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, line)| line)
            .collect()
    }

    fn push(&self, kind: LogKind, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((kind, message.to_string()));
        }
    }
}

impl RunLog for MemoryRunLog {
    fn info(&self, message: &str) {
        self.push(LogKind::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(LogKind::Error, message);
    }

    fn processed(&self, record: &str) {
        self.push(LogKind::Processed, record);
    }
}
