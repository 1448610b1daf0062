//! Document tree nodes
//!
//! Every installed artifact is visible in a hierarchical document tree: one
//! [`Document`] per job definition or editor example, plus `directory`
//! documents forming the tree itself. Trash is soft deletion: a trashed
//! document keeps its record but loses its place in the tree.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on creation
pub type DocumentId = u64;

/// Document type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocType {
    Directory,
    Workflow,
    Coordinator,
    Bundle,
    QueryMapreduce,
    QueryJava,
    /// Legacy link document created as a side effect of workflow
    /// initialization; deleted again by the workflow translator
    LinkPlaceholder,
}

impl DocType {
    /// Whether documents of this type are filed into the examples directory
    /// by the reconciler
    pub fn is_example(self) -> bool {
        matches!(
            self,
            DocType::Workflow
                | DocType::Coordinator
                | DocType::Bundle
                | DocType::QueryMapreduce
                | DocType::QueryJava
        )
    }

    #[allow(dead_code)]
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Directory => "directory",
            DocType::Workflow => "workflow",
            DocType::Coordinator => "coordinator",
            DocType::Bundle => "bundle",
            DocType::QueryMapreduce => "query-mapreduce",
            DocType::QueryJava => "query-java",
            DocType::LinkPlaceholder => "link-placeholder",
        }
    }
}

/// A document to be created by the store
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub name: String,
    pub doc_type: DocType,
    pub owner: String,
    pub parent: Option<DocumentId>,
    pub data: serde_json::Value,
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub doc_type: DocType,
    pub owner: String,
    /// Parent directory; `None` for documents that were never filed
    pub parent: Option<DocumentId>,
    /// Soft-deletion flag; a trashed document is detached from the tree
    #[serde(default)]
    pub trashed: bool,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Document {
    /// A document with no live place in the tree, either never filed or
    /// trashed. The reconciler restores both into the examples directory.
    pub fn is_detached(&self) -> bool {
        self.parent.is_none() || self.trashed
    }
}

/// Permission level of a sharing grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    Read,
    Write,
}

/// A (directory, permission, group) sharing grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareGrant {
    pub directory: DocumentId,
    pub permission: SharePermission,
    pub group: String,
}
