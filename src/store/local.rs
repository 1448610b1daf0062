//! Directory-backed document store
//!
//! State lives in three JSON files (`jobs.json`, `documents.json`,
//! `shares.json`) under the store directory. Transactions are snapshots:
//! `begin` captures the in-memory state, mutations buffer until `commit`
//! persists them, and `rollback` restores the snapshot. Outside a
//! transaction every mutation persists immediately.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{
    DocType, Document, DocumentId, Group, JobId, JobKey, JobKind, JobRecord, NewDocument, NewJob,
    Principal, ShareGrant, SharePermission,
};
use crate::error::{Result, store_corrupt, store_write_failed};
use crate::store::state::StoreState;
use crate::store::Store;

/// Job records file
pub const JOBS_FILE: &str = "jobs.json";
/// Document tree file
pub const DOCUMENTS_FILE: &str = "documents.json";
/// Sharing grants file
pub const SHARES_FILE: &str = "shares.json";

/// JSON-file-backed store with snapshot transactions
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    state: StoreState,
    snapshot: Option<StoreState>,
}

impl LocalStore {
    /// Open a store directory, creating it (empty) when absent
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            store_write_failed(format!("cannot create store directory {}: {e}", dir.display()))
        })?;

        let mut state = StoreState::default();
        state.jobs = load_file(&dir.join(JOBS_FILE))?;
        state.documents = load_file(&dir.join(DOCUMENTS_FILE))?;
        state.shares = load_file(&dir.join(SHARES_FILE))?;
        state.restore_counter();

        debug!(
            store = %dir.display(),
            jobs = state.jobs.len(),
            documents = state.documents.len(),
            "opened store"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            state,
            snapshot: None,
        })
    }

    /// The directory this store persists into
    #[allow(dead_code)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    fn persist(&self) -> Result<()> {
        save_file(&self.dir.join(JOBS_FILE), &self.state.jobs)?;
        save_file(&self.dir.join(DOCUMENTS_FILE), &self.state.documents)?;
        save_file(&self.dir.join(SHARES_FILE), &self.state.shares)?;
        Ok(())
    }

    /// Persist unless inside a transaction (commit persists then)
    fn autocommit(&self) -> Result<()> {
        if self.in_transaction() {
            return Ok(());
        }
        self.persist()
    }
}

fn load_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|e| store_corrupt(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&content)
        .map_err(|e| store_corrupt(path.display().to_string(), e.to_string()))
}

fn save_file<T: serde::Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let content = serde_json::to_string_pretty(records)
        .map_err(|e| store_write_failed(e.to_string()))?;
    fs::write(path, content).map_err(|e| {
        store_write_failed(format!("cannot write {}: {e}", path.display()))
    })
}

impl Store for LocalStore {
    fn supports_atomic_transaction(&self) -> bool {
        true
    }

    fn begin(&mut self) -> Result<()> {
        if self.in_transaction() {
            return Err(store_write_failed("transaction already open"));
        }
        self.snapshot = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.snapshot.take().is_none() {
            return Err(store_write_failed("commit without open transaction"));
        }
        self.persist()
    }

    fn rollback(&mut self) -> Result<()> {
        match self.snapshot.take() {
            Some(snapshot) => {
                self.state = snapshot;
                Ok(())
            }
            None => Err(store_write_failed("rollback without open transaction")),
        }
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
        let record = self.state.create_job(new);
        self.autocommit()?;
        Ok(record)
    }

    fn update_job(&mut self, record: &JobRecord) -> Result<()> {
        self.state.update_job(record)?;
        self.autocommit()
    }

    fn delete_job(&mut self, id: JobId) -> Result<()> {
        self.state.delete_job(id)?;
        self.autocommit()
    }

    fn initialize_workflow(&mut self, id: JobId) -> Result<()> {
        self.state.initialize_workflow(id)?;
        self.autocommit()
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
        let document = self.state.create_document(new);
        self.autocommit()?;
        Ok(document)
    }

    fn update_document(&mut self, document: &Document) -> Result<()> {
        self.state.update_document(document)?;
        self.autocommit()
    }

    fn delete_document(&mut self, id: DocumentId) -> Result<()> {
        self.state.delete_document(id)?;
        self.autocommit()
    }

    fn get_or_create_directory(
        &mut self,
        owner: &Principal,
        parent: Option<DocumentId>,
        name: &str,
    ) -> Result<Document> {
        let directory = self.state.get_or_create_directory(owner, parent, name);
        self.autocommit()?;
        Ok(directory)
    }

    fn grant_share(
        &mut self,
        directory: DocumentId,
        permission: SharePermission,
        group: &Group,
    ) -> Result<()> {
        self.state.grant_share(directory, permission, group);
        self.autocommit()
    }

    fn shares(&self) -> Result<Vec<ShareGrant>> {
        Ok(self.state.shares.clone())
    }
}
