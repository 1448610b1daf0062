//! Catalog directory walking
//!
//! A catalog directory holds one subdirectory per example, each carrying
//! one definition archive per kind present. Every kind's install pass walks
//! the same root and picks up the entries shipping its archive. Iteration
//! is sorted lexicographically by entry name so repeated runs produce
//! identical logs.

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::archive::read_archive;
use crate::context::InstallContext;
use crate::definition::parse_definition;
use crate::error::Result;
use crate::installer::{InstallKind, InstallReport, install_entry};
use crate::progress::ProgressDisplay;
use crate::store::Store;

/// Example subdirectories of a catalog directory, in deterministic order
pub fn catalog_entries(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        debug!(directory = %directory.display(), "catalog directory absent, skipping");
        return Ok(Vec::new());
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    entries.sort();
    Ok(entries)
}

/// Install every entry of one catalog directory
///
/// Failures are scoped to their entry: the error is logged, recorded in the
/// report, and the walk continues with the next entry.
pub fn install_catalog(
    store: &mut dyn Store,
    ctx: &InstallContext,
    directory: &Path,
    strategy: &dyn InstallKind,
    progress: Option<&ProgressDisplay>,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();
    let entries = catalog_entries(directory)?;
    let total = entries.len();

    for (index, entry) in entries.iter().enumerate() {
        let entry_name = entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.display().to_string());
        if let Some(progress) = progress {
            progress.update_entry(&entry_name, index + 1, total);
        }

        let archive_path = entry.join(strategy.kind().archive_name());
        if !archive_path.is_file() {
            // This entry ships no definition of this kind
            debug!(entry = %entry_name, kind = %strategy.kind(), "no archive, skipping");
        } else {
            match install_one(store, ctx, &archive_path, strategy) {
                Ok((name, outcome)) => report.record(name, outcome),
                Err(err) => {
                    error!(entry = %entry_name, error = %err, "catalog entry failed");
                    report.record_failure(entry_name, err);
                }
            }
        }

        if let Some(progress) = progress {
            progress.inc_entry();
        }
    }

    Ok(report)
}

fn install_one(
    store: &mut dyn Store,
    ctx: &InstallContext,
    archive_path: &Path,
    strategy: &dyn InstallKind,
) -> Result<(String, super::EntryOutcome)> {
    let archive = read_archive(archive_path)?;
    let root = parse_definition(&archive.definition)?;
    let outcome = install_entry(store, ctx, strategy, &root, &archive)?;
    Ok((root.name, outcome))
}
