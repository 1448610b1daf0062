//! Document store interface and implementations
//!
//! The pipeline talks to its backend through the object-safe [`Store`]
//! trait. Two implementations ship here:
//!
//! - [`LocalStore`]: JSON state files under a store directory, with
//!   snapshot-based transactions (atomic commit or rollback).
//! - [`MemoryStore`]: in-memory only, and deliberately *not* atomic; it
//!   stands in for backends with mixed storage engines where the installer
//!   must take the compensating-delete path.

mod local;
mod memory;
mod state;

pub use local::LocalStore;
pub use memory::MemoryStore;

use crate::domain::{
    DocType, Document, DocumentId, Group, JobId, JobKey, JobKind, JobRecord, NewDocument, NewJob,
    Principal, ShareGrant, SharePermission,
};
use crate::error::Result;

/// Store interface consumed by the pipeline
///
/// One transaction per catalog entry: `begin` before the owning record is
/// created, `commit` after translation succeeds. Mutations outside a
/// transaction take effect immediately.
pub trait Store {
    /// Whether `rollback` undoes everything since `begin`
    ///
    /// Implementations returning `false` here force the installer to clean
    /// up partially-created records explicitly.
    fn supports_atomic_transaction(&self) -> bool;

    fn begin(&mut self) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
    fn rollback(&mut self) -> Result<()>;

    /// Find a job record by kind and existence key
    fn find_job(&self, kind: JobKind, key: &JobKey) -> Result<Option<JobRecord>>;

    fn job(&self, id: JobId) -> Result<Option<JobRecord>>;

    /// All job records, in creation order
    fn jobs(&self) -> Result<Vec<JobRecord>>;

    fn create_job(&mut self, new: NewJob) -> Result<JobRecord>;

    fn update_job(&mut self, record: &JobRecord) -> Result<()>;

    fn delete_job(&mut self, id: JobId) -> Result<()>;

    /// Initialize a freshly created workflow record
    ///
    /// Seeds the start and end control nodes and, as a legacy side effect,
    /// creates a placeholder link document. The workflow translator deletes
    /// that placeholder once the import is complete.
    fn initialize_workflow(&mut self, id: JobId) -> Result<()>;

    /// All documents, in creation order
    fn documents(&self) -> Result<Vec<Document>>;

    fn find_document(
        &self,
        owner: &str,
        name: &str,
        doc_type: DocType,
    ) -> Result<Option<Document>>;

    /// Documents whose payload links them to the given job record
    fn documents_for_job(&self, job: JobId) -> Result<Vec<Document>>;

    fn create_document(&mut self, new: NewDocument) -> Result<Document>;

    fn update_document(&mut self, document: &Document) -> Result<()>;

    fn delete_document(&mut self, id: DocumentId) -> Result<()>;

    /// Fetch an existing directory or create it; fetch wins over create
    fn get_or_create_directory(
        &mut self,
        owner: &Principal,
        parent: Option<DocumentId>,
        name: &str,
    ) -> Result<Document>;

    /// Grant a group access to a directory; granting twice leaves one grant
    fn grant_share(
        &mut self,
        directory: DocumentId,
        permission: SharePermission,
        group: &Group,
    ) -> Result<()>;

    /// All sharing grants
    #[allow(dead_code)]
    fn shares(&self) -> Result<Vec<ShareGrant>>;
}
