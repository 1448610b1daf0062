//! In-memory document store without transactional guarantees
//!
//! Mirrors a backend whose record kinds live in mixed storage engines:
//! `rollback` is accepted but undoes nothing, so the installer must clean
//! up partially-created records itself. Used in tests and as the reference
//! for the compensating-delete path.

use tracing::debug;

use crate::domain::{
    DocType, Document, DocumentId, Group, JobId, JobKey, JobKind, JobRecord, NewDocument, NewJob,
    Principal, ShareGrant, SharePermission,
};
use crate::error::Result;
use crate::store::state::StoreState;
use crate::store::Store;

/// Volatile store; every mutation is immediately visible and irrevocable
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: StoreState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn supports_atomic_transaction(&self) -> bool {
        false
    }

    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        // Nothing to restore; callers detect this via the capability flag
        debug!("rollback requested on non-atomic store; state unchanged");
        Ok(())
    }

    fn find_job(&self, kind: JobKind, key: &JobKey) -> Result<Option<JobRecord>> {
        Ok(self.state.find_job(kind, key))
    }

    fn job(&self, id: JobId) -> Result<Option<JobRecord>> {
        Ok(self.state.job(id))
    }

    fn jobs(&self) -> Result<Vec<JobRecord>> {
        Ok(self.state.jobs.clone())
    }

    fn create_job(&mut self, new: NewJob) -> Result<JobRecord> {
        Ok(self.state.create_job(new))
    }

    fn update_job(&mut self, record: &JobRecord) -> Result<()> {
        self.state.update_job(record)
    }

    fn delete_job(&mut self, id: JobId) -> Result<()> {
        self.state.delete_job(id)
    }

    fn initialize_workflow(&mut self, id: JobId) -> Result<()> {
        self.state.initialize_workflow(id)
    }

    fn documents(&self) -> Result<Vec<Document>> {
        Ok(self.state.documents.clone())
    }

    fn find_document(
        &self,
        owner: &str,
        name: &str,
        doc_type: DocType,
    ) -> Result<Option<Document>> {
        Ok(self.state.find_document(owner, name, doc_type))
    }

    fn documents_for_job(&self, job: JobId) -> Result<Vec<Document>> {
        Ok(self.state.documents_for_job(job))
    }

    fn create_document(&mut self, new: NewDocument) -> Result<Document> {
        Ok(self.state.create_document(new))
    }

    fn update_document(&mut self, document: &Document) -> Result<()> {
        self.state.update_document(document)
    }

    fn delete_document(&mut self, id: DocumentId) -> Result<()> {
        self.state.delete_document(id)
    }

    fn get_or_create_directory(
        &mut self,
        owner: &Principal,
        parent: Option<DocumentId>,
        name: &str,
    ) -> Result<Document> {
        Ok(self.state.get_or_create_directory(owner, parent, name))
    }

    fn grant_share(
        &mut self,
        directory: DocumentId,
        permission: SharePermission,
        group: &Group,
    ) -> Result<()> {
        self.state.grant_share(directory, permission, group);
        Ok(())
    }

    fn shares(&self) -> Result<Vec<ShareGrant>> {
        Ok(self.state.shares.clone())
    }
}
