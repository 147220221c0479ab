//! Remote file store capability
//!
//! The relocation engine never talks to a protocol directly. Everything it
//! needs from the remote side is expressed by the [`RemoteStore`] trait:
//! probe a size, read or write a whole file, delete, create directories and
//! list a directory as structured [`DirectoryEntry`] values.
//!
//! Two implementations ship with the crate:
//!
//! - [`FtpStore`] wraps an FTP session (the production backend)
//! - [`MemoryStore`] keeps a file tree in memory and records every call,
//!   which is what the test-suite runs against
//!
//! # Examples
//!
//! ```
//! use lpq::remote::{MemoryStore, RemoteStore};
//!
//! let mut store = MemoryStore::new();
//! store.insert_file("/roms/nes/mario.nes", b"rom".to_vec());
//!
//! let entries = store.list_dir("/roms/nes")?;
//! assert_eq!(entries[0].name, "mario.nes");
//! assert_eq!(store.size("/roms/nes/mario.nes")?, 3);
//! # Ok::<(), lpq::StoreError>(())
//! ```

pub mod ftp;
pub mod memory;
pub mod paths;

pub use ftp::FtpStore;
pub use memory::{MemoryStore, StoreCall, StoreOp};

use crate::error::StoreError;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Entry name relative to the listed directory
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
}

impl DirectoryEntry {
    pub fn file<S: Into<String>>(name: S, size: u64) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            size,
        }
    }

    pub fn directory<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            size: 0,
        }
    }
}

/// Operations the relocation engine performs against a remote file service.
///
/// Paths are absolute, `/`-separated strings in the store's namespace.
pub trait RemoteStore {
    /// Size of a file in bytes
    fn size(&mut self, path: &str) -> Result<u64, StoreError>;

    /// Read a whole file into memory
    fn read_all(&mut self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or replace a file with `data`
    fn write_all(&mut self, path: &str, data: &[u8]) -> Result<(), StoreError>;

    fn delete(&mut self, path: &str) -> Result<(), StoreError>;

    /// Create a single directory. Fails if it already exists or the parent is missing.
    fn make_dir(&mut self, path: &str) -> Result<(), StoreError>;

    fn list_dir(&mut self, path: &str) -> Result<Vec<DirectoryEntry>, StoreError>;

    /// End the session. Further calls fail with [`StoreError::Closed`].
    fn close(&mut self) -> Result<(), StoreError>;

    /// Create `path` and every missing ancestor.
    ///
    /// Each level is attempted and its failure ignored: servers report an
    /// existing directory as an error, and a level that genuinely could not be
    /// created surfaces later when the file write fails.
    fn make_dir_all(&mut self, path: &str) {
        let mut current = String::new();
        for part in path.split('/').filter(|part| !part.is_empty()) {
            current.push('/');
            current.push_str(part);
            if let Err(e) = self.make_dir(&current) {
                log::trace!("make_dir {} ignored: {}", current, e);
            }
        }
    }
}
