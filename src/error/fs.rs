//! File system errors

use super::JobseedError;

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> JobseedError {
    JobseedError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> JobseedError {
    JobseedError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a generic IO error
pub fn io_error(message: impl Into<String>) -> JobseedError {
    JobseedError::IoError {
        message: message.into(),
    }
}
