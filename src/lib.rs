// LPQ Library - Public API

// Re-export error types
pub mod error;
pub use error::{
    EntryError, FatalError, LpqError, RelocationError, ResolveError, Result, StoreError,
};

// Module declarations
pub mod commands;
pub mod core;
pub mod remote;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
