//! Playlist-driven quarantine run
//!
//! One run backs up the playlist, then walks its entries in order. For each
//! entry the primary asset is moved under the quarantine prefix, thumbnails
//! sharing its alias are discovered and moved too, and the entry is marked for
//! removal. Failures stay inside the entry that caused them. When every entry
//! has been handled the playlist is rewritten without the moved entries.
//!
//! # Examples
//!
//! ```
//! use lpq::core::orchestrator::{BatchOrchestrator, RunSettings};
//! use lpq::core::relocation::MoveOrder;
//! use lpq::core::resolver::QuarantineRoots;
//! use lpq::core::run_log::MemoryRunLog;
//! use lpq::remote::MemoryStore;
//!
//! let playlist = r#"{"items": [{"path": "/roms/nes/mario.zip#Mario.nes", "db_name": "NES.lpl"}]}"#;
//! let mut store = MemoryStore::new()
//!     .with_file("/playlists/delete.lpl", playlist)
//!     .with_file("/roms/nes/mario.zip", "rom");
//! let log = MemoryRunLog::new();
//! let settings = RunSettings {
//!     playlist_path: "/playlists/delete.lpl".to_string(),
//!     roots: QuarantineRoots::new("/del", "/thumbnails"),
//!     dry_run: false,
//!     move_order: MoveOrder::DeleteFirst,
//! };
//!
//! let report = BatchOrchestrator::new(&mut store, &log, settings).run(|_| {})?;
//! assert_eq!(report.stats.moved_primary, 1);
//! assert!(report.document.is_empty());
//! assert!(store.contains_file("/del/roms/nes/mario.zip"));
//! # Ok::<(), lpq::FatalError>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::core::playlist::{PlaylistDocument, PlaylistEntry};
use crate::core::relocation::{self, MoveOrder, RelocationOptions};
use crate::core::resolver::{self, QuarantineRoots, ResolvedEntry};
use crate::core::run_log::RunLog;
use crate::core::stats::RunStatistics;
use crate::core::walker;
use crate::error::{EntryError, FatalError};
use crate::remote::RemoteStore;

/// Suffix of the playlist backup written before anything else
pub const BACKUP_SUFFIX: &str = ".bkp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub playlist_path: String,
    pub roots: QuarantineRoots,
    pub dry_run: bool,
    pub move_order: MoveOrder,
}

impl RunSettings {
    pub fn backup_path(&self) -> String {
        format!("{}{}", self.playlist_path, BACKUP_SUFFIX)
    }

    fn relocation_options(&self) -> RelocationOptions {
        RelocationOptions {
            dry_run: self.dry_run,
            order: self.move_order,
        }
    }
}

/// Progress notifications emitted while a run is in flight
#[derive(Debug)]
pub enum RunEvent<'a> {
    BackupCreated {
        path: &'a str,
    },
    PlaylistLoaded {
        base_content_directory: &'a str,
        entries: usize,
    },
    EntryRelocated {
        index: usize,
        name: &'a str,
        derived: usize,
    },
    EntryFailed {
        index: usize,
        name: &'a str,
        error: &'a EntryError,
    },
    Cancelled {
        remaining: usize,
    },
    PlaylistRewritten {
        path: &'a str,
        remaining_entries: usize,
    },
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct RunReport {
    /// The playlist without the entries that were moved
    pub document: PlaylistDocument,
    pub stats: RunStatistics,
}

/// Drives one relocation run against a store.
///
/// The orchestrator is the only writer of the statistics and of the
/// playlist's entry list; entries are processed one at a time.
pub struct BatchOrchestrator<'a> {
    store: &'a mut dyn RemoteStore,
    log: &'a dyn RunLog,
    settings: RunSettings,
    cancel_flag: Arc<AtomicBool>,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(store: &'a mut dyn RemoteStore, log: &'a dyn RunLog, settings: RunSettings) -> Self {
        Self {
            store,
            log,
            settings,
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancellation flag (e.g. set from a Ctrl-C handler)
    pub fn with_cancel_flag(mut self, cancel_flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = cancel_flag;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_flag)
    }

    /// Request cancellation; the run stops before the next entry
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Execute the run.
    ///
    /// Only a failure to back up, download or parse the playlist is returned
    /// as an error; per-entry failures are counted in the statistics.
    pub fn run<F>(&mut self, mut on_event: F) -> Result<RunReport, FatalError>
    where
        F: FnMut(RunEvent<'_>),
    {
        let started = Instant::now();
        let mut stats = RunStatistics::new(self.settings.dry_run);

        if self.settings.dry_run {
            self.log.info("=== DRY-RUN MODE: files will not be moved ===");
        }

        let original = self.backup()?;
        let backup_path = self.settings.backup_path();
        on_event(RunEvent::BackupCreated { path: &backup_path });

        let mut document = PlaylistDocument::from_slice(&original).map_err(|source| {
            FatalError::Parse {
                path: self.settings.playlist_path.clone(),
                source,
            }
        })?;

        self.log.info(&format!(
            "Loaded {} with {} entries (base content directory: '{}')",
            self.settings.playlist_path,
            document.len(),
            document.base_content_directory()
        ));
        on_event(RunEvent::PlaylistLoaded {
            base_content_directory: document.base_content_directory(),
            entries: document.len(),
        });

        for (index, entry) in document.items().iter().enumerate() {
            if self.is_cancelled() {
                let remaining = document.len() - index;
                stats.cancelled = true;
                self.log.error(&format!(
                    "Run cancelled, {} entries left unprocessed",
                    remaining
                ));
                on_event(RunEvent::Cancelled { remaining });
                break;
            }

            match self.process_entry(entry, &mut stats) {
                Ok(derived) => {
                    match entry.to_json_line() {
                        Ok(line) => self.log.processed(&line),
                        Err(e) => self.log.error(&format!(
                            "Failed to record processed entry {}: {}",
                            entry.path(),
                            e
                        )),
                    }
                    stats.record_processed(index, entry);
                    on_event(RunEvent::EntryRelocated {
                        index,
                        name: entry.display_name(),
                        derived,
                    });
                }
                Err(error) => {
                    stats.record_error();
                    self.log.error(&format!("Entry {} failed: {}", entry.path(), error));
                    on_event(RunEvent::EntryFailed {
                        index,
                        name: entry.display_name(),
                        error: &error,
                    });
                }
            }
        }

        document.remove_entries(&stats.processed_indices());

        if self.settings.dry_run {
            self.log.info("Dry run: playlist left unchanged");
        } else if stats.cancelled {
            self.log.info("Run cancelled: playlist left unchanged");
        } else {
            match self.rewrite_playlist(&document) {
                Ok(()) => {
                    stats.playlist_rewritten = true;
                    on_event(RunEvent::PlaylistRewritten {
                        path: &self.settings.playlist_path,
                        remaining_entries: document.len(),
                    });
                }
                Err(message) => {
                    stats.record_error();
                    self.log.error(&message);
                }
            }
        }

        stats.elapsed = started.elapsed();
        self.log.info(&format!(
            "Run finished: {} primary ({} bytes), {} derived ({} bytes), {} errors in {:.2}s",
            stats.moved_primary,
            stats.primary_bytes,
            stats.moved_derived,
            stats.derived_bytes,
            stats.errors,
            stats.elapsed.as_secs_f64()
        ));

        Ok(RunReport { document, stats })
    }

    /// Copy the playlist to its `.bkp` sibling and return the original bytes
    fn backup(&mut self) -> Result<Vec<u8>, FatalError> {
        let path = &self.settings.playlist_path;
        let backup_path = self.settings.backup_path();

        let original = self
            .store
            .read_all(path)
            .map_err(|source| FatalError::Download {
                path: path.clone(),
                source,
            })?;

        self.store
            .write_all(&backup_path, &original)
            .map_err(|source| FatalError::Backup {
                path: backup_path.clone(),
                source,
            })?;

        self.log.info(&format!("Backup created: {}", backup_path));
        Ok(original)
    }

    /// Primary asset first; only its failure fails the entry
    fn process_entry(
        &mut self,
        entry: &PlaylistEntry,
        stats: &mut RunStatistics,
    ) -> Result<usize, EntryError> {
        let resolved = resolver::resolve(entry, &self.settings.roots)?;
        let options = self.settings.relocation_options();

        let bytes = relocation::relocate(
            &mut *self.store,
            &resolved.primary.source,
            &resolved.primary.destination,
            options,
            self.log,
        )?;
        stats.record_primary(bytes);

        Ok(self.relocate_derived(&resolved, stats))
    }

    /// Move every thumbnail of `resolved`; returns how many were moved
    fn relocate_derived(&mut self, resolved: &ResolvedEntry, stats: &mut RunStatistics) -> usize {
        let Some(root) = resolved.derived_root.as_deref() else {
            self.log.info(&format!(
                "No collection for {}, skipping thumbnail search",
                resolved.primary.source
            ));
            return 0;
        };

        let matches: Vec<String> = walker::walk(&mut *self.store, root, self.log)
            .into_iter()
            .filter(|path| resolved.matches_derived(path))
            .collect();

        let options = self.settings.relocation_options();
        let mut moved = 0;

        for path in matches {
            let asset = resolved.derived_asset(&path, &self.settings.roots);
            match relocation::relocate(
                &mut *self.store,
                &asset.source,
                &asset.destination,
                options,
                self.log,
            ) {
                Ok(bytes) => {
                    stats.record_derived(bytes);
                    moved += 1;
                }
                Err(e) => {
                    stats.record_error();
                    self.log.error(&format!("Thumbnail {} failed: {}", asset.source, e));
                }
            }
        }

        moved
    }

    fn rewrite_playlist(&mut self, document: &PlaylistDocument) -> Result<(), String> {
        let path = &self.settings.playlist_path;
        let data = document
            .to_pretty_vec()
            .map_err(|e| format!("Failed to serialize playlist {}: {}", path, e))?;

        self.store
            .write_all(path, &data)
            .map_err(|e| format!("Failed to write playlist {}: {}", path, e))?;

        self.log.info(&format!(
            "Playlist {} rewritten with {} entries",
            path,
            document.len()
        ));
        Ok(())
    }
}
