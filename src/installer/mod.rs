//! Idempotent installation of catalog entries
//!
//! This module carries the shared install skeleton: existence check,
//! scoped transaction, translation, and the dual-path failure handling
//! that keeps re-runs safe. Kind-specific behavior (existence key, empty
//! payload, translator) is injected through the [`InstallKind`] strategy,
//! so workflows, coordinators and bundles all run the same algorithm.

pub mod catalog;
pub mod editor;

pub use catalog::install_catalog;
pub use editor::install_editor_examples;

use tracing::{debug, info, warn};

use crate::archive::DefinitionArchive;
use crate::context::InstallContext;
use crate::definition::ParsedRoot;
use crate::domain::{
    BundlePayload, CoordinatorPayload, DocType, JobKey, JobKind, JobPayload, JobRecord, NewDocument,
    NewJob, WorkflowPayload,
};
use crate::error::{JobseedError, Result, store_write_failed};
use crate::hash::hash_definition;
use crate::store::Store;
use crate::translator::{
    BundleTranslator, CoordinatorTranslator, Translator, WorkflowTranslator,
};

/// What happened to one catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Installed,
    AlreadyInstalled,
}

/// Accumulated results of an install run
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, JobseedError)>,
}

impl InstallReport {
    pub fn record(&mut self, name: impl Into<String>, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Installed => self.installed.push(name.into()),
            EntryOutcome::AlreadyInstalled => self.skipped.push(name.into()),
        }
    }

    pub fn record_failure(&mut self, name: impl Into<String>, error: JobseedError) {
        self.failed.push((name.into(), error));
    }

    pub fn merge(&mut self, other: InstallReport) {
        self.installed.extend(other.installed);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Kind-specific strategy plugged into the shared install skeleton
pub trait InstallKind {
    fn kind(&self) -> JobKind;

    /// The existence key for a parsed definition of this kind
    fn existence_key(&self, root: &ParsedRoot) -> JobKey;

    /// Empty payload the owning record is created with
    fn empty_payload(&self) -> JobPayload;

    /// Runs after record creation, before translation
    fn post_create(&self, _store: &mut dyn Store, _record: &JobRecord) -> Result<()> {
        Ok(())
    }

    fn translator(&self) -> &dyn Translator;

    /// Document type of the visible artifact filed by the reconciler
    fn doc_type(&self) -> DocType;
}

/// Managed or unmanaged workflow installation
pub struct WorkflowInstall {
    pub managed: bool,
    translator: WorkflowTranslator,
}

impl WorkflowInstall {
    pub fn new(managed: bool) -> Self {
        Self {
            managed,
            translator: WorkflowTranslator,
        }
    }
}

impl InstallKind for WorkflowInstall {
    fn kind(&self) -> JobKind {
        JobKind::Workflow
    }

    fn existence_key(&self, root: &ParsedRoot) -> JobKey {
        JobKey::workflow(&root.name, self.managed)
    }

    fn empty_payload(&self) -> JobPayload {
        JobPayload::Workflow(WorkflowPayload {
            managed: self.managed,
            actions: Vec::new(),
        })
    }

    fn post_create(&self, store: &mut dyn Store, record: &JobRecord) -> Result<()> {
        store.initialize_workflow(record.id)
    }

    fn translator(&self) -> &dyn Translator {
        &self.translator
    }

    fn doc_type(&self) -> DocType {
        DocType::Workflow
    }
}

/// Coordinator installation
#[derive(Default)]
pub struct CoordinatorInstall {
    translator: CoordinatorTranslator,
}

impl InstallKind for CoordinatorInstall {
    fn kind(&self) -> JobKind {
        JobKind::Coordinator
    }

    fn existence_key(&self, root: &ParsedRoot) -> JobKey {
        JobKey::named(&root.name)
    }

    fn empty_payload(&self) -> JobPayload {
        JobPayload::Coordinator(CoordinatorPayload {
            workflow: None,
            frequency: None,
            timezone: None,
            start: None,
            end: None,
        })
    }

    fn translator(&self) -> &dyn Translator {
        &self.translator
    }

    fn doc_type(&self) -> DocType {
        DocType::Coordinator
    }
}

/// Bundle installation
#[derive(Default)]
pub struct BundleInstall {
    translator: BundleTranslator,
}

impl InstallKind for BundleInstall {
    fn kind(&self) -> JobKind {
        JobKind::Bundle
    }

    fn existence_key(&self, root: &ParsedRoot) -> JobKey {
        JobKey::named(&root.name)
    }

    fn empty_payload(&self) -> JobPayload {
        JobPayload::Bundle(BundlePayload {
            kickoff: None,
            attached: Vec::new(),
        })
    }

    fn translator(&self) -> &dyn Translator {
        &self.translator
    }

    fn doc_type(&self) -> DocType {
        DocType::Bundle
    }
}

/// Install one parsed catalog entry
///
/// The defining property of the pipeline: when a record matching the
/// existence key is already in the store, nothing is written and the entry
/// is skipped.
pub fn install_entry(
    store: &mut dyn Store,
    ctx: &InstallContext,
    strategy: &dyn InstallKind,
    root: &ParsedRoot,
    archive: &DefinitionArchive,
) -> Result<EntryOutcome> {
    let kind = strategy.kind();
    let key = strategy.existence_key(root);

    if store.find_job(kind, &key)?.is_some() {
        info!(%kind, name = %key, "already installed, skipping");
        return Ok(EntryOutcome::AlreadyInstalled);
    }

    info!(%kind, name = %root.name, "installing");
    debug!(%kind, name = %root.name, definition = %archive.definition, "definition");

    store.begin()?;
    let created = match store.create_job(NewJob {
        name: root.name.clone(),
        owner: ctx.user.name.clone(),
        is_shared: true,
        created_at: ctx.started_at,
        definition_hash: hash_definition(&archive.definition),
        payload: strategy.empty_payload(),
    }) {
        Ok(record) => record,
        Err(err) => {
            // Nothing was created; just close the scope
            let _ = store.rollback();
            return Err(err);
        }
    };

    match populate_entry(store, ctx, strategy, &created, root, archive) {
        Ok(()) => {
            store.commit()?;
            Ok(EntryOutcome::Installed)
        }
        Err(err) => {
            abandon_entry(store, &created)?;
            Err(err)
        }
    }
}

/// Initialization, translation and the visible artifact document
fn populate_entry(
    store: &mut dyn Store,
    ctx: &InstallContext,
    strategy: &dyn InstallKind,
    created: &JobRecord,
    root: &ParsedRoot,
    archive: &DefinitionArchive,
) -> Result<()> {
    strategy.post_create(store, created)?;

    // Reload so the translator sees what post_create added
    let mut record = store
        .job(created.id)?
        .ok_or_else(|| store_write_failed("record vanished during install"))?;
    strategy
        .translator()
        .translate(store, &mut record, root, &archive.metadata)?;

    store.create_document(NewDocument {
        name: record.name.clone(),
        doc_type: strategy.doc_type(),
        owner: ctx.user.name.clone(),
        parent: None,
        data: serde_json::json!({ "job_id": record.id }),
    })?;
    Ok(())
}

/// Make a failed entry invisible again
///
/// Stores with atomic transactions roll back. Stores without them cannot;
/// there the just-created record and its documents are deleted explicitly
/// before the error is re-surfaced.
fn abandon_entry(store: &mut dyn Store, created: &JobRecord) -> Result<()> {
    if store.supports_atomic_transaction() {
        warn!(name = %created.name, "install failed, rolling back");
        return store.rollback();
    }

    warn!(
        name = %created.name,
        "install failed on a non-transactional store, deleting partial record"
    );
    for document in store.documents_for_job(created.id)? {
        store.delete_document(document.id)?;
    }
    store.delete_job(created.id)?;
    store.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Metadata;
    use crate::definition::parse_definition;
    use crate::settings::Settings;
    use crate::store::{LocalStore, MemoryStore};
    use tempfile::TempDir;

    fn ctx() -> InstallContext {
        InstallContext::from_settings(&Settings::default())
    }

    fn sleep_archive() -> (ParsedRoot, DefinitionArchive) {
        let xml = r#"<workflow name="sleep-test">
            <action name="sleep-1" type="shell" ok="end" error="fail"/>
            <kill name="fail"/>
        </workflow>"#;
        let root = parse_definition(xml).unwrap();
        let archive = DefinitionArchive {
            definition: xml.to_string(),
            metadata: Metadata::default(),
        };
        (root, archive)
    }

    #[test]
    fn test_install_then_skip() {
        let mut store = MemoryStore::new();
        let ctx = ctx();
        let strategy = WorkflowInstall::new(false);
        let (root, archive) = sleep_archive();

        let first = install_entry(&mut store, &ctx, &strategy, &root, &archive).unwrap();
        assert_eq!(first, EntryOutcome::Installed);

        let second = install_entry(&mut store, &ctx, &strategy, &root, &archive).unwrap();
        assert_eq!(second, EntryOutcome::AlreadyInstalled);

        assert_eq!(store.jobs().unwrap().len(), 1);
    }

    #[test]
    fn test_installed_workflow_matches_parsed_children() {
        let mut store = MemoryStore::new();
        let strategy = WorkflowInstall::new(false);
        let (root, archive) = sleep_archive();

        install_entry(&mut store, &ctx(), &strategy, &root, &archive).unwrap();

        let record = store
            .find_job(JobKind::Workflow, &JobKey::workflow("sleep-test", false))
            .unwrap()
            .unwrap();
        // Parsed children plus the start/end control nodes
        assert_eq!(record.actions().unwrap().len(), root.children().len() + 2);
    }

    #[test]
    fn test_managed_and_unmanaged_coexist() {
        let mut store = MemoryStore::new();
        let (root, archive) = sleep_archive();

        install_entry(&mut store, &ctx(), &WorkflowInstall::new(true), &root, &archive).unwrap();
        install_entry(&mut store, &ctx(), &WorkflowInstall::new(false), &root, &archive).unwrap();

        assert_eq!(store.jobs().unwrap().len(), 2);
    }

    #[test]
    fn test_unresolved_reference_leaves_no_record_non_atomic() {
        let mut store = MemoryStore::new();
        let xml = r#"<coordinator name="orphan" workflow="missing"/>"#;
        let root = parse_definition(xml).unwrap();
        let archive = DefinitionArchive {
            definition: xml.to_string(),
            metadata: Metadata::default(),
        };

        let result = install_entry(
            &mut store,
            &ctx(),
            &CoordinatorInstall::default(),
            &root,
            &archive,
        );
        assert!(matches!(
            result,
            Err(JobseedError::UnresolvedReference { .. })
        ));

        // Compensating delete: the partially-created record is gone
        assert!(store.jobs().unwrap().is_empty());
        assert!(store.documents().unwrap().is_empty());
    }

    #[test]
    fn test_unresolved_reference_rolls_back_atomic() {
        let temp = TempDir::new().unwrap();
        let mut store = LocalStore::open(&temp.path().join("store")).unwrap();
        let xml = r#"<coordinator name="orphan" workflow="missing"/>"#;
        let root = parse_definition(xml).unwrap();
        let archive = DefinitionArchive {
            definition: xml.to_string(),
            metadata: Metadata::default(),
        };

        let result = install_entry(
            &mut store,
            &ctx(),
            &CoordinatorInstall::default(),
            &root,
            &archive,
        );
        assert!(result.is_err());
        assert!(store.jobs().unwrap().is_empty());
    }

    #[test]
    fn test_artifact_document_created_detached() {
        let mut store = MemoryStore::new();
        let strategy = WorkflowInstall::new(true);
        let (root, archive) = sleep_archive();

        install_entry(&mut store, &ctx(), &strategy, &root, &archive).unwrap();

        let documents = store.documents().unwrap();
        let artifact: Vec<_> = documents
            .iter()
            .filter(|d| d.doc_type == DocType::Workflow)
            .collect();
        assert_eq!(artifact.len(), 1);
        assert!(artifact[0].parent.is_none());

        // The initialization placeholder is gone again
        assert!(
            !documents
                .iter()
                .any(|d| d.doc_type == DocType::LinkPlaceholder)
        );
    }
}
