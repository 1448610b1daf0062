//! List command implementation
//!
//! Lists installed example definitions with their kind, sharing state and,
//! in detailed mode, the definition hash and structure counts.

use std::path::PathBuf;

use console::Style;

use crate::cli::ListArgs;
use crate::domain::{JobPayload, JobRecord};
use crate::error::{JobseedError, Result};
use crate::settings::Settings;
use crate::store::{LocalStore, Store};

/// Run list command
pub fn run(config: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let working_dir = std::env::current_dir().map_err(|e| JobseedError::IoError {
        message: format!("Failed to get current directory: {}", e),
    })?;
    let settings = Settings::load_or_default(config.as_deref(), &working_dir)?;
    let store = LocalStore::open(&settings.store_dir)?;

    list_jobs(&store, args.detailed)
}

fn list_jobs(store: &LocalStore, detailed: bool) -> Result<()> {
    let jobs = store.jobs()?;

    if jobs.is_empty() {
        println!("No examples installed.");
        return Ok(());
    }

    println!("Installed examples ({}):", jobs.len());
    println!();

    for job in &jobs {
        if detailed {
            display_job_detailed(job);
        } else {
            display_job_simple(job);
        }
        println!();
    }

    Ok(())
}

fn display_job_simple(job: &JobRecord) {
    println!(
        "  {} {}",
        Style::new().bold().yellow().apply_to(&job.name),
        Style::new().dim().apply_to(format!("[{}]", job.kind())),
    );
    println!(
        "    {} {}",
        Style::new().bold().apply_to("Owner:"),
        job.owner
    );
    if let JobPayload::Workflow(wf) = &job.payload {
        println!(
            "    {} {}",
            Style::new().bold().apply_to("Managed:"),
            wf.managed
        );
    }
}

fn display_job_detailed(job: &JobRecord) {
    display_job_simple(job);
    println!(
        "    {} {}",
        Style::new().bold().apply_to("Installed:"),
        job.created_at.to_rfc3339()
    );
    println!(
        "    {} {}",
        Style::new().bold().apply_to("Definition:"),
        job.definition_hash
    );
    match &job.payload {
        JobPayload::Workflow(wf) => {
            println!(
                "    {} {}",
                Style::new().bold().apply_to("Actions:"),
                wf.actions.len()
            );
        }
        JobPayload::Coordinator(coord) => {
            if let Some(frequency) = &coord.frequency {
                println!(
                    "    {} {}",
                    Style::new().bold().apply_to("Frequency:"),
                    frequency
                );
            }
        }
        JobPayload::Bundle(bundle) => {
            println!(
                "    {} {}",
                Style::new().bold().apply_to("Coordinators:"),
                bundle.attached.len()
            );
        }
    }
}
