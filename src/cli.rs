//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Jobseed - example job provisioning
///
/// Install the example workflow, coordinator and bundle catalog into the
/// document store and stage sample data, exactly once per deployment.
#[derive(Parser, Debug)]
#[command(
    name = "jobseed",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Idempotent installer for example job definitions",
    long_about = "Jobseed provisions a catalog of example job definitions (workflows, \
                  coordinators, bundles) into the document store, stages the sample \
                  binaries onto the remote filesystem, and files everything into a \
                  shared examples directory. Re-running is always safe.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  jobseed install\n    \
                  jobseed install --config /etc/jobseed.yaml\n    \
                  jobseed list --detailed\n    \
                  jobseed -vv install\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/jobseed/jobseed"
)]
pub struct Cli {
    /// Configuration file (defaults to jobseed.yaml in the current directory)
    #[arg(long, short = 'c', global = true, env = "JOBSEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage samples and install the example catalog
    Install(InstallArgs),

    /// List installed example definitions
    List(ListArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install with the configuration from ./jobseed.yaml:\n    jobseed install\n\n\
                  Install with an explicit configuration:\n    jobseed install --config /etc/jobseed.yaml\n\n\
                  Install without progress bars (CI/cron):\n    jobseed install --no-progress")]
pub struct InstallArgs {
    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List installed examples:\n    jobseed list\n\n\
                  Show detailed information:\n    jobseed list --detailed")]
pub struct ListArgs {
    /// Show detailed output
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    jobseed completions --shell bash > ~/.bash_completion.d/jobseed\n\n\
                  Generate zsh completions:\n    jobseed completions --shell zsh > ~/.zfunc/_jobseed\n\n\
                  Generate fish completions:\n    jobseed completions --shell fish > ~/.config/fish/completions/jobseed.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_install() {
        let cli = Cli::try_parse_from(["jobseed", "install"]).unwrap();
        match cli.command {
            Commands::Install(args) => assert!(!args.no_progress),
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_no_progress() {
        let cli = Cli::try_parse_from(["jobseed", "install", "--no-progress"]).unwrap();
        match cli.command {
            Commands::Install(args) => assert!(args.no_progress),
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_list() {
        let cli = Cli::try_parse_from(["jobseed", "list", "--detailed"]).unwrap();
        match cli.command {
            Commands::List(args) => assert!(args.detailed),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["jobseed", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli =
            Cli::try_parse_from(["jobseed", "-vv", "-c", "/etc/jobseed.yaml", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/jobseed.yaml")));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["jobseed", "completions", "--shell", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "bash"),
            _ => panic!("Expected Completions command"),
        }
    }
}
