//! Definition archive reading
//!
//! A definition archive is a gzip-compressed tar with exactly two logical
//! members: the definition XML and a `metadata.json` sidecar of ordered
//! key/value entries. Reading is the only operation; archives are immutable
//! catalog content.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::{Result, archive_corrupt};

/// Name of the metadata member inside every definition archive
pub const METADATA_MEMBER: &str = "metadata.json";

/// Ordered key/value metadata shipped next to a definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Build metadata from already-ordered entries
    pub fn from_entries(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// Parse the metadata member, preserving entry order
    pub fn parse(json: &str) -> std::result::Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| e.to_string())?;
        let object = value
            .as_object()
            .ok_or_else(|| "metadata must be a JSON object".to_string())?;

        let entries = object
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect();
        Ok(Self { entries })
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Entries whose key starts with `prefix`, with the prefix stripped
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries.iter().filter_map(move |(k, v)| {
            k.strip_prefix(prefix).map(|stripped| (stripped, v.as_str()))
        })
    }

    /// All entries, in sidecar order
    #[allow(dead_code)]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Contents of one definition archive
#[derive(Debug, Clone)]
pub struct DefinitionArchive {
    /// Raw definition XML
    pub definition: String,
    /// Ordered sidecar metadata
    pub metadata: Metadata,
}

/// Read a definition archive from disk
///
/// Fails with `ArchiveCorrupt` when the container cannot be opened, a member
/// is missing or duplicated, a member is not valid UTF-8, or the archive
/// carries members beyond the expected two.
pub fn read_archive(path: &Path) -> Result<DefinitionArchive> {
    let display = path.display().to_string();
    let file =
        File::open(path).map_err(|e| archive_corrupt(&display, e.to_string()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let mut definition: Option<String> = None;
    let mut metadata_json: Option<String> = None;

    let entries = archive
        .entries()
        .map_err(|e| archive_corrupt(&display, e.to_string()))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| archive_corrupt(&display, e.to_string()))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let member_name = entry
            .path()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .ok_or_else(|| archive_corrupt(&display, "member with unreadable name"))?;

        let mut content = String::new();
        entry.read_to_string(&mut content).map_err(|e| {
            archive_corrupt(&display, format!("member '{member_name}': {e}"))
        })?;

        if member_name == METADATA_MEMBER {
            if metadata_json.replace(content).is_some() {
                return Err(archive_corrupt(&display, "duplicate metadata member"));
            }
        } else if member_name.ends_with(".xml") {
            if definition.replace(content).is_some() {
                return Err(archive_corrupt(&display, "more than one definition member"));
            }
        } else {
            return Err(archive_corrupt(
                &display,
                format!("unexpected member '{member_name}'"),
            ));
        }
    }

    let definition =
        definition.ok_or_else(|| archive_corrupt(&display, "missing definition member"))?;
    let metadata_json = metadata_json
        .ok_or_else(|| archive_corrupt(&display, format!("missing {METADATA_MEMBER}")))?;
    let metadata = Metadata::parse(&metadata_json)
        .map_err(|reason| archive_corrupt(&display, format!("{METADATA_MEMBER}: {reason}")))?;

    Ok(DefinitionArchive {
        definition,
        metadata,
    })
}
