//! Install command implementation
//!
//! Runs the whole provisioning pipeline:
//! 1. Load settings and resolve the install principal
//! 2. Stage sample binaries and data to the remote filesystem (a failure
//!    here aborts before anything touches the store)
//! 3. Install the workflow, coordinator and bundle catalogs, idempotently
//! 4. Install the built-in editor examples
//! 5. Reconcile the document tree and share the examples directory

use std::path::PathBuf;

use console::Style;

use crate::cli::InstallArgs;
use crate::context::InstallContext;
use crate::error::{JobseedError, Result};
use crate::installer::{
    BundleInstall, CoordinatorInstall, InstallKind, InstallReport, WorkflowInstall,
    catalog::catalog_entries, install_catalog, install_editor_examples,
};
use crate::progress::ProgressDisplay;
use crate::reconciler::reconcile;
use crate::remote::MirrorFs;
use crate::settings::Settings;
use crate::stager::{stage_examples, staging_plan};
use crate::store::LocalStore;

/// Run install command
pub fn run(config: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let working_dir = std::env::current_dir().map_err(|e| JobseedError::IoError {
        message: format!("Failed to get current directory: {}", e),
    })?;
    let settings = Settings::load_or_default(config.as_deref(), &working_dir)?;
    let ctx = InstallContext::from_settings(&settings);

    let mut store = LocalStore::open(&settings.store_dir)?;
    let mut fs = MirrorFs::new(settings.remote_fs_root.clone());

    // Workflows first: coordinators resolve them by name, bundles resolve
    // coordinators. The unmanaged subtree installs with managed=false.
    let catalogs: [(PathBuf, Box<dyn InstallKind>); 4] = [
        (settings.catalog_dir.clone(), Box::new(WorkflowInstall::new(true))),
        (settings.unmanaged_dir(), Box::new(WorkflowInstall::new(false))),
        (settings.catalog_dir.clone(), Box::new(CoordinatorInstall::default())),
        (settings.catalog_dir.clone(), Box::new(BundleInstall::default())),
    ];

    let progress = build_progress(&args, &settings, &catalogs);

    // Stage first; installed definitions reference the staged binaries
    let staging = match stage_examples(&mut fs, &ctx, &settings, progress.as_ref()) {
        Ok(report) => report,
        Err(err) => {
            if let Some(progress) = &progress {
                progress.abandon();
            }
            return Err(err);
        }
    };

    let mut report = InstallReport::default();
    for (directory, strategy) in &catalogs {
        report.merge(install_catalog(
            &mut store,
            &ctx,
            directory,
            strategy.as_ref(),
            progress.as_ref(),
        )?);
    }
    report.merge(install_editor_examples(
        &mut store,
        &ctx,
        &settings.remote_root,
    )?);

    let reconciled = reconcile(&mut store, &ctx)?;

    if let Some(progress) = &progress {
        progress.finish();
    }

    print_summary(&report, staging.staged.len(), reconciled.restored.len());
    Ok(())
}

fn build_progress(
    args: &InstallArgs,
    settings: &Settings,
    catalogs: &[(PathBuf, Box<dyn InstallKind>); 4],
) -> Option<ProgressDisplay> {
    if args.no_progress {
        return None;
    }

    let total_entries: usize = catalogs
        .iter()
        .map(|(dir, _)| catalog_entries(dir).map(|e| e.len()).unwrap_or(0))
        .sum();
    let mut progress = ProgressDisplay::new(total_entries as u64);
    if let Ok(plan) = staging_plan(settings) {
        progress.init_copy_progress(plan.len() as u64);
    }
    Some(progress)
}

fn print_summary(report: &InstallReport, staged: usize, restored: usize) {
    let bold = Style::new().bold();
    println!();
    println!(
        "{} {} staged, {} installed, {} already present, {} restored",
        bold.apply_to("Examples:"),
        staged,
        report.installed.len(),
        report.skipped.len(),
        restored,
    );

    for name in &report.installed {
        println!("  {} {}", Style::new().green().apply_to("+"), name);
    }
    for name in &report.skipped {
        println!("  {} {} (already installed)", Style::new().dim().apply_to("="), name);
    }

    if report.has_failures() {
        println!();
        println!(
            "{} {} entr{} failed:",
            Style::new().red().bold().apply_to("Warning:"),
            report.failed.len(),
            if report.failed.len() == 1 { "y" } else { "ies" },
        );
        for (name, error) in &report.failed {
            println!("  {} {}: {}", Style::new().red().apply_to("x"), name, error);
        }
        println!("Re-run the install after fixing the catalog; completed entries are skipped.");
    }
}
