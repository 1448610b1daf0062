//! Request-scoped install context
//!
//! The original pipeline kept the acting user and filesystem handle as
//! ambient state; here they are resolved once per run and threaded
//! explicitly through staging, installation and reconciliation.

use chrono::{DateTime, Utc};

use crate::domain::{Group, Principal};
use crate::domain::principal::{resolve_default_group, resolve_install_user};
use crate::settings::Settings;

/// State shared by every stage of one pipeline run
#[derive(Debug, Clone)]
pub struct InstallContext {
    /// Principal all records are owned by and all copies run as
    pub user: Principal,
    /// Group the examples directory is shared with
    pub group: Group,
    /// Timestamp recorded on every record created in this run
    pub started_at: DateTime<Utc>,
}

impl InstallContext {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            user: resolve_install_user(settings),
            group: resolve_default_group(settings),
            started_at: Utc::now(),
        }
    }
}
