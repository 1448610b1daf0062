//! Definition parsing and reference errors

use super::JobseedError;

/// Creates a malformed definition error
pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> JobseedError {
    JobseedError::MalformedDefinition {
        name: name.into(),
        reason: reason.into(),
    }
}

/// Creates an unresolved reference error
pub fn unresolved(
    kind: impl Into<String>,
    referenced: impl Into<String>,
    wanted_by: impl Into<String>,
) -> JobseedError {
    JobseedError::UnresolvedReference {
        kind: kind.into(),
        referenced: referenced.into(),
        wanted_by: wanted_by.into(),
    }
}
