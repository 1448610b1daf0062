//! Jobseed - example job provisioning
//!
//! A command line tool that installs a fixed catalog of example job
//! definitions (workflows, coordinators, bundles) into the document store
//! and stages sample data, idempotently: re-running is always safe.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod archive;
mod cli;
mod commands;
mod context;
mod definition;
mod domain;
mod error;
mod hash;
mod installer;
mod progress;
mod reconciler;
mod remote;
mod settings;
mod stager;
mod store;
mod translator;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.config, args),
        Commands::List(args) => commands::list::run(cli.config, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing with verbosity from repeated `-v` flags
///
/// `RUST_LOG` wins when set, so operators can focus on single modules.
fn init_tracing(verbose: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directive) => EnvFilter::new(directive),
        Err(_) => match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
