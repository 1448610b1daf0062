//! Definition archive errors

use super::JobseedError;

/// Creates an archive corrupt error
pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> JobseedError {
    JobseedError::ArchiveCorrupt {
        path: path.into(),
        reason: reason.into(),
    }
}
