//! Principals and groups
//!
//! The pipeline never authenticates anyone. It runs as a designated install
//! principal resolved from configuration, and shares the examples directory
//! with a well-known default group.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// A user the pipeline acts as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A group documents can be shared with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolve the principal every install runs as
pub fn resolve_install_user(settings: &Settings) -> Principal {
    Principal::new(&settings.install_user)
}

/// Resolve the group the examples directory is shared with
pub fn resolve_default_group(settings: &Settings) -> Group {
    Group::new(&settings.default_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_from_settings() {
        let settings = Settings::default();
        assert_eq!(resolve_install_user(&settings).name, "jobseed");
        assert_eq!(resolve_default_group(&settings).name, "default");
    }

    #[test]
    fn test_display() {
        assert_eq!(Principal::new("sample").to_string(), "sample");
        assert_eq!(Group::new("analysts").to_string(), "analysts");
    }
}
