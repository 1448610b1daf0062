//! Shared in-memory store state
//!
//! Both store implementations operate on the same [`StoreState`]; they
//! differ only in persistence and transaction guarantees.

use serde::{Deserialize, Serialize};

use crate::domain::{
    DocType, Document, DocumentId, Group, JobId, JobKey, JobKind, JobRecord, JobPayload,
    NewDocument, NewJob, Principal, ShareGrant, SharePermission, WorkflowAction,
};
use crate::error::{Result, store_write_failed};

/// Key under which documents record the job they belong to
pub(crate) const JOB_LINK_KEY: &str = "job_id";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    next_id: u64,
    pub(crate) jobs: Vec<JobRecord>,
    pub(crate) documents: Vec<Document>,
    pub(crate) shares: Vec<ShareGrant>,
}

impl StoreState {
    /// Rebuild the id counter after loading persisted records
    pub(crate) fn restore_counter(&mut self) {
        let max_job = self.jobs.iter().map(|j| j.id).max().unwrap_or(0);
        let max_doc = self.documents.iter().map(|d| d.id).max().unwrap_or(0);
        self.next_id = max_job.max(max_doc);
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn find_job(&self, kind: JobKind, key: &JobKey) -> Option<JobRecord> {
        self.jobs.iter().find(|j| j.matches(kind, key)).cloned()
    }

    pub(crate) fn job(&self, id: JobId) -> Option<JobRecord> {
        self.jobs.iter().find(|j| j.id == id).cloned()
    }

    pub(crate) fn create_job(&mut self, new: NewJob) -> JobRecord {
        let record = JobRecord {
            id: self.allocate_id(),
            name: new.name,
            owner: new.owner,
            is_shared: new.is_shared,
            created_at: new.created_at,
            definition_hash: new.definition_hash,
            payload: new.payload,
        };
        self.jobs.push(record.clone());
        record
    }

    pub(crate) fn update_job(&mut self, record: &JobRecord) -> Result<()> {
        match self.jobs.iter_mut().find(|j| j.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(store_write_failed(format!(
                "job record {} does not exist",
                record.id
            ))),
        }
    }

    pub(crate) fn delete_job(&mut self, id: JobId) -> Result<()> {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != id);
        if self.jobs.len() == before {
            return Err(store_write_failed(format!("job record {id} does not exist")));
        }
        Ok(())
    }

    pub(crate) fn initialize_workflow(&mut self, id: JobId) -> Result<()> {
        let (name, owner) = {
            let record = self
                .jobs
                .iter_mut()
                .find(|j| j.id == id)
                .ok_or_else(|| store_write_failed(format!("job record {id} does not exist")))?;
            let JobPayload::Workflow(payload) = &mut record.payload else {
                return Err(store_write_failed(format!(
                    "job record {id} is not a workflow"
                )));
            };
            payload.actions.insert(0, WorkflowAction::start());
            payload.actions.push(WorkflowAction::end());
            (record.name.clone(), record.owner.clone())
        };

        // Legacy link document; the workflow translator removes it again
        self.create_document(NewDocument {
            name,
            doc_type: DocType::LinkPlaceholder,
            owner,
            parent: None,
            data: serde_json::json!({ JOB_LINK_KEY: id }),
        });
        Ok(())
    }

    pub(crate) fn find_document(
        &self,
        owner: &str,
        name: &str,
        doc_type: DocType,
    ) -> Option<Document> {
        self.documents
            .iter()
            .find(|d| d.owner == owner && d.name == name && d.doc_type == doc_type)
            .cloned()
    }

    pub(crate) fn documents_for_job(&self, job: JobId) -> Vec<Document> {
        self.documents
            .iter()
            .filter(|d| {
                d.data
                    .get(JOB_LINK_KEY)
                    .and_then(serde_json::Value::as_u64)
                    == Some(job)
            })
            .cloned()
            .collect()
    }

    pub(crate) fn create_document(&mut self, new: NewDocument) -> Document {
        let document = Document {
            id: self.allocate_id(),
            name: new.name,
            doc_type: new.doc_type,
            owner: new.owner,
            parent: new.parent,
            trashed: false,
            data: new.data,
        };
        self.documents.push(document.clone());
        document
    }

    pub(crate) fn update_document(&mut self, document: &Document) -> Result<()> {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(slot) => {
                *slot = document.clone();
                Ok(())
            }
            None => Err(store_write_failed(format!(
                "document {} does not exist",
                document.id
            ))),
        }
    }

    pub(crate) fn delete_document(&mut self, id: DocumentId) -> Result<()> {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != id);
        if self.documents.len() == before {
            return Err(store_write_failed(format!("document {id} does not exist")));
        }
        Ok(())
    }

    pub(crate) fn get_or_create_directory(
        &mut self,
        owner: &Principal,
        parent: Option<DocumentId>,
        name: &str,
    ) -> Document {
        let existing = self.documents.iter().find(|d| {
            d.doc_type == DocType::Directory
                && d.owner == owner.name
                && d.name == name
                && d.parent == parent
        });
        if let Some(directory) = existing {
            return directory.clone();
        }
        self.create_document(NewDocument {
            name: name.to_string(),
            doc_type: DocType::Directory,
            owner: owner.name.clone(),
            parent,
            data: serde_json::Value::Null,
        })
    }

    pub(crate) fn grant_share(
        &mut self,
        directory: DocumentId,
        permission: SharePermission,
        group: &Group,
    ) {
        let grant = ShareGrant {
            directory,
            permission,
            group: group.name.clone(),
        };
        if !self.shares.contains(&grant) {
            self.shares.push(grant);
        }
    }
}
