//! Document store errors

use super::JobseedError;

/// Creates a store write failed error
pub fn write_failed(reason: impl Into<String>) -> JobseedError {
    JobseedError::StoreWriteFailed {
        reason: reason.into(),
    }
}

/// Creates a store corrupt error
pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> JobseedError {
    JobseedError::StoreCorrupt {
        path: path.into(),
        reason: reason.into(),
    }
}
