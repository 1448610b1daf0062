//! Job definition records
//!
//! A [`JobRecord`] is the persisted form of one installed catalog entry:
//! a workflow, a coordinator referencing exactly one workflow, or a bundle
//! referencing a set of coordinators. Records are created once per catalog
//! entry and never updated in place by the pipeline; re-runs are no-ops.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on creation
pub type JobId = u64;

/// The three installable definition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Workflow,
    Coordinator,
    Bundle,
}

impl JobKind {
    /// File name of the definition archive for this kind inside a catalog entry
    pub fn archive_name(self) -> &'static str {
        match self {
            JobKind::Workflow => "workflow.tar.gz",
            JobKind::Coordinator => "coordinator.tar.gz",
            JobKind::Bundle => "bundle.tar.gz",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Workflow => "workflow",
            JobKind::Coordinator => "coordinator",
            JobKind::Bundle => "bundle",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Existence key used by the idempotence check
///
/// Workflows are keyed by `(name, managed)`; coordinators and bundles by
/// name alone. The asymmetry mirrors the catalog: only workflows ship in a
/// managed and an unmanaged variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobKey {
    pub name: String,
    pub managed: Option<bool>,
}

impl JobKey {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            managed: None,
        }
    }

    pub fn workflow(name: impl Into<String>, managed: bool) -> Self {
        Self {
            name: name.into(),
            managed: Some(managed),
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.managed {
            Some(managed) => write!(f, "{} (managed={})", self.name, managed),
            None => f.write_str(&self.name),
        }
    }
}

/// One action node inside a workflow, with its control-flow edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowAction {
    pub name: String,
    pub action_type: String,
    /// Name of the node to transition to on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok_to: Option<String>,
    /// Name of the node to transition to on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_to: Option<String>,
    /// Task-specific attributes from the definition and metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl WorkflowAction {
    /// The start control node every initialized workflow begins with
    pub fn start() -> Self {
        Self {
            name: "start".to_string(),
            action_type: "start".to_string(),
            ok_to: Some("end".to_string()),
            error_to: None,
            attributes: BTreeMap::new(),
        }
    }

    /// The end control node every initialized workflow terminates in
    pub fn end() -> Self {
        Self {
            name: "end".to_string(),
            action_type: "end".to_string(),
            ok_to: None,
            error_to: None,
            attributes: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPayload {
    /// Catalog-shipped examples are managed; user-editable copies are not
    pub managed: bool,
    pub actions: Vec<WorkflowAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorPayload {
    /// The workflow this coordinator schedules; set by the translator once
    /// the reference is resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<JobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// A coordinator attached to a bundle, with its coordination parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundledCoordinator {
    pub coordinator: JobId,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundlePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kickoff: Option<String>,
    pub attached: Vec<BundledCoordinator>,
}

/// Kind-specific record contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JobPayload {
    Workflow(WorkflowPayload),
    Coordinator(CoordinatorPayload),
    Bundle(BundlePayload),
}

impl JobPayload {
    pub fn kind(&self) -> JobKind {
        match self {
            JobPayload::Workflow(_) => JobKind::Workflow,
            JobPayload::Coordinator(_) => JobKind::Coordinator,
            JobPayload::Bundle(_) => JobKind::Bundle,
        }
    }
}

/// A job definition to be created by the store
#[derive(Debug, Clone)]
pub struct NewJob {
    pub name: String,
    pub owner: String,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    /// BLAKE3 hash of the definition text the record was installed from
    pub definition_hash: String,
    pub payload: JobPayload,
}

/// A persisted job definition record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub name: String,
    pub owner: String,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    pub definition_hash: String,
    #[serde(flatten)]
    pub payload: JobPayload,
}

impl JobRecord {
    pub fn kind(&self) -> JobKind {
        self.payload.kind()
    }

    /// The existence key this record answers to
    #[allow(dead_code)]
    pub fn key(&self) -> JobKey {
        match &self.payload {
            JobPayload::Workflow(wf) => JobKey::workflow(&self.name, wf.managed),
            _ => JobKey::named(&self.name),
        }
    }

    pub fn matches(&self, kind: JobKind, key: &JobKey) -> bool {
        if self.kind() != kind || self.name != key.name {
            return false;
        }
        match (&self.payload, key.managed) {
            (JobPayload::Workflow(wf), Some(managed)) => wf.managed == managed,
            _ => true,
        }
    }

    /// The workflow action list, when this record is a workflow
    pub fn actions(&self) -> Option<&[WorkflowAction]> {
        match &self.payload {
            JobPayload::Workflow(wf) => Some(&wf.actions),
            _ => None,
        }
    }
}
