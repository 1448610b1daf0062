//! Configuration errors

use super::JobseedError;

/// Creates a config not found error
pub fn not_found(path: impl Into<String>) -> JobseedError {
    JobseedError::ConfigNotFound { path: path.into() }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> JobseedError {
    JobseedError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
