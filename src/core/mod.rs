// Core business logic module

pub mod config;
pub mod orchestrator;
pub mod playlist;
pub mod relocation;
pub mod resolver;
pub mod run_log;
pub mod stats;
pub mod walker;

// Re-export commonly used items
pub use config::{Config, RemoteSettings};
pub use orchestrator::{BatchOrchestrator, RunEvent, RunReport, RunSettings};
pub use playlist::{PlaylistDocument, PlaylistEntry};
pub use relocation::{MoveOrder, RelocationOptions};
pub use resolver::{AssetKind, QuarantineRoots, ResolvedAsset, ResolvedEntry};
pub use run_log::{FileRunLog, MemoryRunLog, RunLog};
pub use stats::RunStatistics;
