//! Path derivation for playlist entries.
//!
//! An entry's `path` has the form `<file path>#<alias>.<ext>`: the real file
//! on the store, then the name the game is known by. Thumbnails are looked up
//! by that alias under `<thumbnails root>/<collection>`, where the collection
//! is the entry's `db_name` without its extension.
//!
//! Everything here is pure: no store access, no logging.

use crate::core::playlist::PlaylistEntry;
use crate::error::ResolveError;
use crate::remote::paths;

pub const ALIAS_DELIMITER: char = '#';

/// Extension of thumbnail files
pub const DERIVED_EXTENSION: &str = "png";

/// The two configured roots every destination and search is derived from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantineRoots {
    quarantine_prefix: String,
    thumbnails_root: String,
}

impl QuarantineRoots {
    pub fn new(quarantine_prefix: &str, thumbnails_root: &str) -> Self {
        Self {
            quarantine_prefix: quarantine_prefix.trim_end_matches('/').to_string(),
            thumbnails_root: thumbnails_root.trim_end_matches('/').to_string(),
        }
    }

    pub fn quarantine_prefix(&self) -> &str {
        &self.quarantine_prefix
    }

    pub fn thumbnails_root(&self) -> &str {
        &self.thumbnails_root
    }

    /// Quarantine location of `source`, mirroring its full path
    pub fn destination_for(&self, source: &str) -> String {
        if source.starts_with('/') {
            format!("{}{}", self.quarantine_prefix, source)
        } else {
            format!("{}/{}", self.quarantine_prefix, source)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Primary,
    Derived,
}

/// A file to move and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub kind: AssetKind,
    pub source: String,
    pub destination: String,
    pub alias: String,
}

/// Everything derived from one playlist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub primary: ResolvedAsset,
    /// `db_name` without extension
    pub collection: String,
    /// Where thumbnails for this entry are searched, `None` without a collection
    pub derived_root: Option<String>,
}

impl ResolvedEntry {
    pub fn alias(&self) -> &str {
        &self.primary.alias
    }

    /// File name a thumbnail must have to belong to this entry
    pub fn derived_file_name(&self) -> String {
        format!("{}.{}", self.primary.alias, DERIVED_EXTENSION)
    }

    /// Whether a discovered file is one of this entry's thumbnails.
    ///
    /// The whole file name must equal `<alias>.png`; `Mario Bros2.png` does
    /// not belong to `Mario Bros`.
    pub fn matches_derived(&self, path: &str) -> bool {
        let suffix = format!("/{}", self.derived_file_name());
        path.ends_with(&suffix)
    }

    pub fn derived_asset(&self, source: &str, roots: &QuarantineRoots) -> ResolvedAsset {
        ResolvedAsset {
            kind: AssetKind::Derived,
            source: source.to_string(),
            destination: roots.destination_for(source),
            alias: self.primary.alias.clone(),
        }
    }
}

/// Remove the last `.ext` suffix, if any
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}

/// Derive the primary asset, alias and thumbnail search root of `entry`.
///
/// The entry path must hold exactly one `#`. A path without one, or with
/// several, is [`ResolveError::InvalidPath`]: the ROM location would be
/// ambiguous.
pub fn resolve(entry: &PlaylistEntry, roots: &QuarantineRoots) -> Result<ResolvedEntry, ResolveError> {
    let (file_path, alias_ext) = entry
        .path()
        .split_once(ALIAS_DELIMITER)
        .ok_or_else(|| ResolveError::InvalidPath(entry.path().to_string()))?;

    if file_path.is_empty() || alias_ext.contains(ALIAS_DELIMITER) {
        return Err(ResolveError::InvalidPath(entry.path().to_string()));
    }

    let alias = strip_extension(alias_ext).to_string();
    let collection = strip_extension(entry.db_name()).to_string();
    let derived_root = if collection.is_empty() {
        None
    } else {
        Some(paths::join(roots.thumbnails_root(), &collection))
    };

    Ok(ResolvedEntry {
        primary: ResolvedAsset {
            kind: AssetKind::Primary,
            source: file_path.to_string(),
            destination: roots.destination_for(file_path),
            alias,
        },
        collection,
        derived_root,
    })
}
