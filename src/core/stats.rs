use std::time::Duration;

use crate::core::playlist::PlaylistEntry;

/// An entry whose primary asset was relocated
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedEntry {
    /// Position in the playlist as loaded
    pub index: usize,
    pub entry: PlaylistEntry,
}

/// Statistics from a relocation run
#[derive(Debug, Default, Clone)]
pub struct RunStatistics {
    pub moved_primary: usize,
    pub moved_derived: usize,
    pub primary_bytes: u64,
    pub derived_bytes: u64,
    pub errors: usize,
    pub elapsed: Duration,
    pub processed: Vec<ProcessedEntry>,
    pub dry_run: bool,
    /// The run stopped early on request; remaining entries were not touched
    pub cancelled: bool,
    /// The updated playlist was written back to the store
    pub playlist_rewritten: bool,
}

impl RunStatistics {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    pub fn record_primary(&mut self, bytes: u64) {
        self.moved_primary += 1;
        self.primary_bytes += bytes;
    }

    pub fn record_derived(&mut self, bytes: u64) {
        self.moved_derived += 1;
        self.derived_bytes += bytes;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn record_processed(&mut self, index: usize, entry: &PlaylistEntry) {
        self.processed.push(ProcessedEntry {
            index,
            entry: entry.clone(),
        });
    }

    pub fn total_bytes(&self) -> u64 {
        self.primary_bytes + self.derived_bytes
    }

    /// Playlist positions of processed entries
    pub fn processed_indices(&self) -> Vec<usize> {
        self.processed.iter().map(|p| p.index).collect()
    }

    /// Everything except timing, for comparing two runs
    pub fn counts(&self) -> (usize, usize, u64, u64, usize) {
        (
            self.moved_primary,
            self.moved_derived,
            self.primary_bytes,
            self.derived_bytes,
            self.errors,
        )
    }
}
