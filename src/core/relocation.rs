//! Moving one file into quarantine.
//!
//! The store has no rename across trees that works reliably on every server,
//! so a move is a read, a write and a delete. The default order deletes the
//! source before writing the destination; a crash between the two loses the
//! file. [`MoveOrder::WriteFirst`] closes that window and leaves a duplicate
//! behind instead when the final delete fails.

use serde::{Deserialize, Serialize};

use crate::core::run_log::RunLog;
use crate::error::{RelocationError, TransferStage};
use crate::remote::{paths, RemoteStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveOrder {
    /// read, delete source, create directories, write destination
    #[default]
    DeleteFirst,
    /// read, create directories, write destination, delete source
    WriteFirst,
}

impl std::str::FromStr for MoveOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete-first" => Ok(MoveOrder::DeleteFirst),
            "write-first" => Ok(MoveOrder::WriteFirst),
            other => Err(format!(
                "unknown move order '{}' (expected delete-first or write-first)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationOptions {
    pub dry_run: bool,
    pub order: MoveOrder,
}

/// Size of `path`, or 0 when the store cannot tell
pub fn probe_size(store: &mut dyn RemoteStore, path: &str, log: &dyn RunLog) -> u64 {
    match store.size(path) {
        Ok(size) => size,
        Err(e) => {
            log.error(&format!("Failed to get size of {}: {}", path, e));
            0
        }
    }
}

/// Delete `path`, reporting whether it worked.
///
/// Callers ignore the result on purpose: once the destination write has
/// succeeded (or is about to be attempted) a leftover source is not a failed move.
pub fn delete_best_effort(store: &mut dyn RemoteStore, path: &str) -> bool {
    match store.delete(path) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Ignoring failed delete of {}: {}", path, e);
            false
        }
    }
}

/// Move `src` to `dest` and return the probed size of `src`.
///
/// In dry-run mode only the size probe touches the store.
pub fn relocate(
    store: &mut dyn RemoteStore,
    src: &str,
    dest: &str,
    options: RelocationOptions,
    log: &dyn RunLog,
) -> Result<u64, RelocationError> {
    let size = probe_size(store, src, log);

    if options.dry_run {
        log.info(&format!("[DRY-RUN] Move: {} -> {}", src, dest));
        return Ok(size);
    }

    let failed = |stage: TransferStage, source| RelocationError::TransferFailed {
        src: src.to_string(),
        dest: dest.to_string(),
        stage,
        source,
    };

    let content = store
        .read_all(src)
        .map_err(|e| failed(TransferStage::Read, e))?;

    match options.order {
        MoveOrder::DeleteFirst => {
            let _ = delete_best_effort(store, src);
            store.make_dir_all(paths::parent(dest));
            store
                .write_all(dest, &content)
                .map_err(|e| failed(TransferStage::Write, e))?;
        }
        MoveOrder::WriteFirst => {
            store.make_dir_all(paths::parent(dest));
            store
                .write_all(dest, &content)
                .map_err(|e| failed(TransferStage::Write, e))?;
            let _ = delete_best_effort(store, src);
        }
    }

    log.info(&format!("Moved: {} -> {} ({} bytes)", src, dest, size));
    Ok(size)
}
