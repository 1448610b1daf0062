//! Remote staging errors

use super::JobseedError;

/// Creates a staging failed error
pub fn failed(
    local: impl Into<String>,
    remote: impl Into<String>,
    reason: impl Into<String>,
) -> JobseedError {
    JobseedError::StagingFailed {
        local: local.into(),
        remote: remote.into(),
        reason: reason.into(),
    }
}
