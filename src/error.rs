use std::io;
use thiserror::Error;

/// Custom error type for LPQ
#[derive(Error, Debug)]
pub enum LpqError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for LPQ
pub type Result<T> = std::result::Result<T, LpqError>;

impl LpqError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LpqError::Config(msg.into())
    }
}

/// Failure reported by a [`crate::remote::RemoteStore`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("cannot connect to {host}:{port}: {message}")]
    Connect {
        host: String,
        port: u16,
        message: String,
    },

    #[error("{op} {path}: {message}")]
    Operation {
        op: &'static str,
        path: String,
        message: String,
    },

    #[error("store session is closed")]
    Closed,
}

impl StoreError {
    /// Create an operation error from any displayable cause
    pub fn operation<P, M>(op: &'static str, path: P, message: M) -> Self
    where
        P: Into<String>,
        M: std::fmt::Display,
    {
        StoreError::Operation {
            op,
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// A playlist entry whose paths cannot be derived
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid path (expected exactly one '#' alias delimiter): {0}")]
    InvalidPath(String),
}

/// Stage of a relocation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    Read,
    Write,
}

impl std::fmt::Display for TransferStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferStage::Read => write!(f, "read"),
            TransferStage::Write => write!(f, "write"),
        }
    }
}

/// A move that could not be completed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelocationError {
    #[error("transfer failed ({stage}) {src} -> {dest}: {source}")]
    TransferFailed {
        src: String,
        dest: String,
        stage: TransferStage,
        source: StoreError,
    },
}

/// Failure confined to a single playlist entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Relocation(#[from] RelocationError),
}

/// Failure that ends the whole run
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("cannot connect to remote store: {0}")]
    Connect(#[source] StoreError),

    #[error("cannot back up playlist {path}: {source}")]
    Backup { path: String, source: StoreError },

    #[error("cannot download playlist {path}: {source}")]
    Download { path: String, source: StoreError },

    #[error("cannot parse playlist {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}
