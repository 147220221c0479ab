//! RetroArch playlist (`.lpl`) model.
//!
//! Only `base_content_directory`, `items`, and each item's `path` and
//! `db_name` are interpreted. Everything else is carried along untouched and
//! in its original key order, so a rewritten playlist differs from the input
//! only by the entries that were removed.

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

use crate::core::resolver::ALIAS_DELIMITER;
use crate::remote::paths;

/// One item of a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PlaylistEntry {
    path: String,
    db_name: String,
    fields: Map<String, Value>,
}

impl PlaylistEntry {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Any raw field, known or not
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// File name of the ROM part of `path`, for console output
    pub fn display_name(&self) -> &str {
        let rom = match self.path.split_once(ALIAS_DELIMITER) {
            Some((rom, _)) => rom,
            None => self.path.as_str(),
        };
        paths::file_name(rom)
    }

    /// Single-line JSON with `", "` and `": "` separators, as written to the
    /// processed log
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let mut line = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut line, SpacedFormatter);
        self.fields.serialize(&mut serializer)?;
        // serde_json only emits UTF-8
        Ok(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Compact JSON with a space after every `,` and `:`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl From<Map<String, Value>> for PlaylistEntry {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            path: string_field(&fields, "path"),
            db_name: string_field(&fields, "db_name"),
            fields,
        }
    }
}

impl From<PlaylistEntry> for Map<String, Value> {
    fn from(entry: PlaylistEntry) -> Self {
        entry.fields
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PlaylistDocument {
    base_content_directory: String,
    items: Vec<PlaylistEntry>,
    fields: Map<String, Value>,
}

impl PlaylistDocument {
    pub fn from_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Pretty-printed with two-space indentation, UTF-8, no trailing newline
    pub fn to_pretty_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    pub fn base_content_directory(&self) -> &str {
        &self.base_content_directory
    }

    pub fn items(&self) -> &[PlaylistEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop the entries at `indices`; unknown indices are ignored
    pub fn remove_entries(&mut self, indices: &[usize]) {
        let mut index = 0;
        self.items.retain(|_| {
            let keep = !indices.contains(&index);
            index += 1;
            keep
        });
    }
}

impl TryFrom<Map<String, Value>> for PlaylistDocument {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let items = match fields.get("items") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| match item {
                    Value::Object(map) => Ok(PlaylistEntry::from(map.clone())),
                    other => Err(format!("items[{}] is not an object: {}", idx, other)),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(format!("`items` is not an array: {}", other)),
        };

        // The typed list is the single source of truth; keep only the key's position
        if let Some(slot) = fields.get_mut("items") {
            *slot = Value::Null;
        }

        Ok(Self {
            base_content_directory: string_field(&fields, "base_content_directory"),
            items,
            fields,
        })
    }
}

impl From<PlaylistDocument> for Map<String, Value> {
    fn from(document: PlaylistDocument) -> Self {
        let mut fields = document.fields;
        if fields.contains_key("items") || !document.items.is_empty() {
            let items = document
                .items
                .into_iter()
                .map(|entry| Value::Object(entry.into()))
                .collect();
            // Replacing an existing key keeps its position
            fields.insert("items".to_string(), Value::Array(items));
        }
        fields
    }
}
