//! Error types and handling for Jobseed
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`archive`]: Definition archive errors
//! - [`definition`]: Definition parsing and reference errors
//! - [`staging`]: Remote staging errors
//! - [`store`]: Document store errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors

#![allow(dead_code)]

// Declare submodules
pub mod archive;
pub mod config;
pub mod definition;
pub mod fs;
pub mod staging;
pub mod store;

// Re-export convenience constructors from submodules
pub use archive::corrupt as archive_corrupt;
pub use config::{not_found as config_not_found, parse_failed as config_parse_failed};
pub use definition::{malformed as malformed_definition, unresolved as unresolved_reference};
#[allow(unused_imports)]
pub use fs::{io_error, read_failed as file_read_failed, write_failed as file_write_failed};
pub use staging::failed as staging_failed;
pub use store::{corrupt as store_corrupt, write_failed as store_write_failed};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Jobseed operations
#[derive(Error, Diagnostic, Debug)]
pub enum JobseedError {
    // Archive errors
    #[error("Definition archive is corrupt: {path}")]
    #[diagnostic(
        code(jobseed::archive::corrupt),
        help("A definition archive must be a gzip-compressed tar with a definition XML and a metadata.json member")
    )]
    ArchiveCorrupt { path: String, reason: String },

    // Definition errors
    #[error("Malformed definition '{name}'")]
    #[diagnostic(code(jobseed::definition::malformed))]
    MalformedDefinition { name: String, reason: String },

    #[error("Unresolved reference to {kind} '{referenced}' required by '{wanted_by}'")]
    #[diagnostic(
        code(jobseed::definition::unresolved_reference),
        help("Install the referenced definition first, or check the name in the definition archive")
    )]
    UnresolvedReference {
        kind: String,
        referenced: String,
        wanted_by: String,
    },

    // Staging errors
    #[error("Failed to stage '{local}' to '{remote}'")]
    #[diagnostic(
        code(jobseed::staging::failed),
        help("Staged binaries are a prerequisite for installation; nothing was installed")
    )]
    StagingFailed {
        local: String,
        remote: String,
        reason: String,
    },

    // Store errors
    #[error("Store write failed: {reason}")]
    #[diagnostic(code(jobseed::store::write_failed))]
    StoreWriteFailed { reason: String },

    #[error("Store state is corrupt: {path}")]
    #[diagnostic(
        code(jobseed::store::corrupt),
        help("Remove the store directory to rebuild it from scratch, then re-run the install")
    )]
    StoreCorrupt { path: String, reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(jobseed::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(jobseed::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(jobseed::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(jobseed::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(jobseed::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for JobseedError {
    fn from(err: std::io::Error) -> Self {
        JobseedError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for JobseedError {
    fn from(err: serde_yaml::Error) -> Self {
        JobseedError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, JobseedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JobseedError::ArchiveCorrupt {
            path: "catalog/sleep/workflow.tar.gz".to_string(),
            reason: "missing metadata.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Definition archive is corrupt: catalog/sleep/workflow.tar.gz"
        );
    }

    #[test]
    fn test_error_code() {
        let err = JobseedError::UnresolvedReference {
            kind: "workflow".to_string(),
            referenced: "daily-rollup".to_string(),
            wanted_by: "daily-rollup-coord".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("jobseed::definition::unresolved_reference".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: JobseedError = io_err.into();
        assert!(matches!(err, JobseedError::IoError { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: yaml: content: [unclosed";
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str(yaml_str);
        let yaml_err = parse_result.unwrap_err();
        let err: JobseedError = yaml_err.into();
        assert!(matches!(err, JobseedError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_unresolved_reference_message() {
        let err = unresolved_reference("coordinator", "hourly-ingest", "ingest-bundle");
        assert!(
            err.to_string()
                .contains("Unresolved reference to coordinator 'hourly-ingest'")
        );
        assert!(err.to_string().contains("'ingest-bundle'"));
    }

    #[test]
    fn test_staging_failed_message() {
        let err = staging_failed("samples/sleep", "/user/jobseed/examples/sleep", "disk full");
        assert!(matches!(err, JobseedError::StagingFailed { .. }));
        assert!(err.to_string().contains("Failed to stage"));
    }

    #[test]
    fn test_store_write_failed_message() {
        let err = store_write_failed("jobs.json is read-only");
        assert!(matches!(err, JobseedError::StoreWriteFailed { .. }));
        assert!(err.to_string().contains("Store write failed"));
    }

    #[test]
    fn test_config_not_found_message() {
        let err = config_not_found("/etc/jobseed.yaml");
        assert!(matches!(err, JobseedError::ConfigNotFound { .. }));
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
