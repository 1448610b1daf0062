//! Remote staging of example binaries and sample data
//!
//! Runs before any installation: every child directory of the local sample
//! directory is copied under the remote root, then the sample data
//! directory is copied to `<remote_root>/data`. Copies execute as the
//! install principal. Any failure aborts the whole run; installed
//! definitions reference these binaries and must not outrun them.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::context::InstallContext;
use crate::error::{Result, staging_failed};
use crate::progress::ProgressDisplay;
use crate::remote::{RemoteFs, remote_join};
use crate::settings::Settings;

/// One planned copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCopy {
    pub local: PathBuf,
    pub remote: String,
}

/// Results of a staging pass
#[derive(Debug, Default)]
pub struct StagingReport {
    /// Remote paths written, in copy order
    pub staged: Vec<String>,
}

/// The fixed copy catalog for a configuration
///
/// Deterministic: sample children are sorted by name, the data directory
/// comes last.
pub fn staging_plan(settings: &Settings) -> Result<Vec<StagedCopy>> {
    let sample_dir = canonical(&settings.sample_dir);
    if !sample_dir.is_dir() {
        return Err(staging_failed(
            sample_dir.display().to_string(),
            &settings.remote_root,
            "local sample directory does not exist",
        ));
    }

    let mut plan = Vec::new();
    let mut children: Vec<PathBuf> = std::fs::read_dir(&sample_dir)
        .map_err(|e| {
            staging_failed(
                sample_dir.display().to_string(),
                &settings.remote_root,
                e.to_string(),
            )
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    children.sort();

    for child in children {
        let name = match child.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        plan.push(StagedCopy {
            remote: remote_join(&settings.remote_root, &name),
            local: child,
        });
    }

    plan.push(StagedCopy {
        local: canonical(&settings.sample_data_dir),
        remote: remote_join(&settings.remote_root, "data"),
    });
    Ok(plan)
}

/// Copy the sample catalog to the remote filesystem as the install user
pub fn stage_examples(
    fs: &mut dyn RemoteFs,
    ctx: &InstallContext,
    settings: &Settings,
    progress: Option<&ProgressDisplay>,
) -> Result<StagingReport> {
    info!(remote = %settings.remote_root, "creating remote sample directory");
    fs.mkdir_p(&settings.remote_root).map_err(|e| {
        staging_failed(
            settings.sample_dir.display().to_string(),
            &settings.remote_root,
            format!("cannot create remote root: {e}"),
        )
    })?;

    let plan = staging_plan(settings)?;
    let mut report = StagingReport::default();

    for copy in plan {
        info!(
            local = %copy.local.display(),
            remote = %copy.remote,
            "staging"
        );
        if let Some(progress) = progress {
            progress.update_copy(&copy.remote);
        }

        fs.copy_as_user(&ctx.user, &copy.local, &copy.remote)
            .map_err(|e| {
                staging_failed(
                    copy.local.display().to_string(),
                    copy.remote.clone(),
                    e.to_string(),
                )
            })?;
        report.staged.push(copy.remote);
    }

    Ok(report)
}

/// Canonical local path where possible; Windows-safe via dunce
fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
