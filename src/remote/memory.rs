//! In-memory remote store.
//!
//! Behaves like a strict FTP server: `make_dir` fails on an existing
//! directory, writes fail when the parent directory is missing. Every call is
//! appended to a journal so tests can assert on operation ordering, and any
//! operation can be made to fail for a given path.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::paths;
use super::{DirectoryEntry, RemoteStore};
use crate::error::StoreError;

/// Kind of store operation, used for the journal and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Size,
    Read,
    Write,
    Delete,
    MakeDir,
    List,
}

impl StoreOp {
    /// Whether the operation changes remote state
    pub fn is_mutation(self) -> bool {
        matches!(self, StoreOp::Write | StoreOp::Delete | StoreOp::MakeDir)
    }

    fn command(self) -> &'static str {
        match self {
            StoreOp::Size => "SIZE",
            StoreOp::Read => "RETR",
            StoreOp::Write => "STOR",
            StoreOp::Delete => "DELE",
            StoreOp::MakeDir => "MKD",
            StoreOp::List => "LIST",
        }
    }
}

/// A recorded call against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    failures: HashSet<(StoreOp, String)>,
    calls: Vec<StoreCall>,
    closed: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert("/".to_string());
        Self {
            files: BTreeMap::new(),
            dirs,
            failures: HashSet::new(),
            calls: Vec::new(),
            closed: false,
        }
    }

    /// Builder variant of [`MemoryStore::insert_file`]
    pub fn with_file<P: Into<String>, D: Into<Vec<u8>>>(mut self, path: P, data: D) -> Self {
        self.insert_file(path, data);
        self
    }

    /// Seed a file, creating its ancestors. Not recorded in the journal.
    pub fn insert_file<P: Into<String>, D: Into<Vec<u8>>>(&mut self, path: P, data: D) {
        let path = path.into();
        self.insert_dir(paths::parent(&path));
        self.files.insert(path, data.into());
    }

    /// Seed a directory and its ancestors. Not recorded in the journal.
    pub fn insert_dir(&mut self, path: &str) {
        let mut current = String::new();
        for part in path.split('/').filter(|part| !part.is_empty()) {
            current.push('/');
            current.push_str(part);
            self.dirs.insert(current.clone());
        }
    }

    /// Make every future `op` on `path` fail
    pub fn fail_on<P: Into<String>>(&mut self, op: StoreOp, path: P) {
        self.failures.insert((op, path.into()));
    }

    pub fn file(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn contains_dir(&self, path: &str) -> bool {
        self.dirs.contains(paths::normalize_dir(path))
    }

    pub fn file_paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> &[StoreCall] {
        &self.calls
    }

    /// Calls that changed remote state
    pub fn mutations(&self) -> Vec<&StoreCall> {
        self.calls.iter().filter(|call| call.op.is_mutation()).collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Snapshot of the file tree, for comparing state across runs
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.files.clone()
    }

    fn begin(&mut self, op: StoreOp, path: &str) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        self.calls.push(StoreCall {
            op,
            path: path.to_string(),
        });
        if self.failures.contains(&(op, path.to_string())) {
            return Err(StoreError::operation(op.command(), path, "injected failure"));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    fn size(&mut self, path: &str) -> Result<u64, StoreError> {
        self.begin(StoreOp::Size, path)?;
        self.files
            .get(path)
            .map(|data| data.len() as u64)
            .ok_or_else(|| StoreError::operation("SIZE", path, "550 no such file"))
    }

    fn read_all(&mut self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.begin(StoreOp::Read, path)?;
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::operation("RETR", path, "550 no such file"))
    }

    fn write_all(&mut self, path: &str, data: &[u8]) -> Result<(), StoreError> {
        self.begin(StoreOp::Write, path)?;
        if !self.dirs.contains(paths::parent(path)) {
            return Err(StoreError::operation("STOR", path, "553 parent directory missing"));
        }
        self.files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<(), StoreError> {
        self.begin(StoreOp::Delete, path)?;
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::operation("DELE", path, "550 no such file"))
    }

    fn make_dir(&mut self, path: &str) -> Result<(), StoreError> {
        self.begin(StoreOp::MakeDir, path)?;
        let path = paths::normalize_dir(path);
        if self.dirs.contains(path) || self.files.contains_key(path) {
            return Err(StoreError::operation("MKD", path, "550 already exists"));
        }
        if !self.dirs.contains(paths::parent(path)) {
            return Err(StoreError::operation("MKD", path, "550 parent directory missing"));
        }
        self.dirs.insert(path.to_string());
        Ok(())
    }

    fn list_dir(&mut self, path: &str) -> Result<Vec<DirectoryEntry>, StoreError> {
        self.begin(StoreOp::List, path)?;
        let dir = paths::normalize_dir(path);
        if !self.dirs.contains(dir) {
            return Err(StoreError::operation("LIST", path, "550 no such directory"));
        }

        let mut entries: Vec<DirectoryEntry> = self
            .dirs
            .iter()
            .filter(|candidate| candidate.as_str() != "/" && paths::parent(candidate) == dir)
            .map(|candidate| DirectoryEntry::directory(paths::file_name(candidate)))
            .collect();

        entries.extend(
            self.files
                .iter()
                .filter(|(candidate, _)| paths::parent(candidate) == dir)
                .map(|(candidate, data)| {
                    DirectoryEntry::file(paths::file_name(candidate), data.len() as u64)
                }),
        );

        Ok(entries)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        self.closed = true;
        Ok(())
    }
}
