//! Coordinator import translation

use crate::archive::Metadata;
use crate::definition::ParsedRoot;
use crate::domain::{JobKey, JobKind, JobPayload, JobRecord};
use crate::error::{Result, malformed_definition, store_write_failed, unresolved_reference};
use crate::store::Store;
use crate::translator::Translator;

/// Translates coordinator definitions: resolves the scheduled workflow and
/// attaches trigger/frequency attributes
#[derive(Debug, Default)]
pub struct CoordinatorTranslator;

fn lookup<'a>(root: &'a ParsedRoot, metadata: &'a Metadata, key: &str) -> Option<&'a str> {
    root.attr(key).or_else(|| metadata.get(key))
}

impl Translator for CoordinatorTranslator {
    fn translate(
        &self,
        store: &mut dyn Store,
        record: &mut JobRecord,
        root: &ParsedRoot,
        metadata: &Metadata,
    ) -> Result<()> {
        let workflow_name = lookup(root, metadata, "workflow").ok_or_else(|| {
            malformed_definition(&record.name, "coordinator names no workflow")
        })?;

        let workflow = store
            .find_job(JobKind::Workflow, &JobKey::named(workflow_name))?
            .ok_or_else(|| {
                unresolved_reference("workflow", workflow_name, &record.name)
            })?;

        {
            let JobPayload::Coordinator(payload) = &mut record.payload else {
                return Err(store_write_failed(format!(
                    "record '{}' is not a coordinator",
                    record.name
                )));
            };
            payload.workflow = Some(workflow.id);
            payload.frequency = lookup(root, metadata, "frequency").map(str::to_string);
            payload.timezone = lookup(root, metadata, "timezone").map(str::to_string);
            payload.start = lookup(root, metadata, "start").map(str::to_string);
            payload.end = lookup(root, metadata, "end").map(str::to_string);
        }

        store.update_job(record)
    }
}
