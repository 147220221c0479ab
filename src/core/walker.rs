//! Recursive file discovery over a store that can only list one directory at a time.

use crate::core::run_log::RunLog;
use crate::remote::{paths, RemoteStore};

/// Return every regular file below `root`, in discovery order.
///
/// Depth-first with an explicit stack, so deep trees cannot overflow the call
/// stack. A directory that fails to list is reported to the error log and
/// skipped; the walk goes on with whatever is left on the stack. The store is
/// assumed to expose a tree, so there is no cycle detection.
pub fn walk(store: &mut dyn RemoteStore, root: &str, log: &dyn RunLog) -> Vec<String> {
    let mut files = Vec::new();
    let mut stack = vec![paths::normalize_dir(root).to_string()];

    while let Some(current) = stack.pop() {
        let entries = match store.list_dir(&current) {
            Ok(entries) => entries,
            Err(e) => {
                log.error(&format!("Failed to list {}: {}", current, e));
                continue;
            }
        };

        for entry in entries {
            if entry.name.is_empty() || entry.name == "." || entry.name == ".." {
                continue;
            }
            let full_path = paths::join(&current, &entry.name);
            if entry.is_directory {
                stack.push(full_path);
            } else {
                files.push(full_path);
            }
        }
    }

    files
}
