//! Workflow import translation

use std::collections::BTreeMap;

use tracing::debug;

use crate::archive::Metadata;
use crate::definition::{ParsedNode, ParsedRoot};
use crate::domain::{DocType, JobPayload, JobRecord, WorkflowAction};
use crate::error::{Result, malformed_definition, store_write_failed};
use crate::store::Store;
use crate::translator::Translator;

/// Translates workflow definitions into action nodes with ok/error edges
#[derive(Debug, Default)]
pub struct WorkflowTranslator;

impl WorkflowTranslator {
    fn action_from(node: &ParsedNode, record_name: &str, metadata: &Metadata) -> Result<WorkflowAction> {
        let name = node.name().ok_or_else(|| {
            malformed_definition(record_name, format!("<{}> node without name attribute", node.tag))
        })?;

        let mut attributes: BTreeMap<String, String> = node
            .attributes()
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "name" | "type" | "ok" | "error"))
            .cloned()
            .collect();

        // Sidecar metadata may refine individual actions
        let prefix = format!("action.{name}.");
        for (key, value) in metadata.with_prefix(&prefix) {
            attributes.insert(key.to_string(), value.to_string());
        }

        Ok(WorkflowAction {
            name: name.to_string(),
            action_type: node
                .attr("type")
                .unwrap_or(node.tag.as_str())
                .to_string(),
            ok_to: node.attr("ok").map(str::to_string),
            error_to: node.attr("error").map(str::to_string),
            attributes,
        })
    }
}

impl Translator for WorkflowTranslator {
    fn translate(
        &self,
        store: &mut dyn Store,
        record: &mut JobRecord,
        root: &ParsedRoot,
        metadata: &Metadata,
    ) -> Result<()> {
        let actions: Vec<WorkflowAction> = root
            .children()
            .iter()
            .map(|node| Self::action_from(node, &record.name, metadata))
            .collect::<Result<_>>()?;

        {
            let JobPayload::Workflow(payload) = &mut record.payload else {
                return Err(store_write_failed(format!(
                    "record '{}' is not a workflow",
                    record.name
                )));
            };

            // Splice imported actions between the start and end control nodes
            let end_at = payload
                .actions
                .iter()
                .position(|a| a.action_type == "end")
                .unwrap_or(payload.actions.len());
            if let Some(first) = actions.first() {
                if let Some(start) = payload
                    .actions
                    .iter_mut()
                    .find(|a| a.action_type == "start")
                {
                    start.ok_to = Some(first.name.clone());
                }
            }
            payload.actions.splice(end_at..end_at, actions);
        }

        store.update_job(record)?;

        // Workflow initialization left a placeholder link document behind;
        // it would show up next to the shared example, so remove it
        for document in store.documents_for_job(record.id)? {
            if document.doc_type == DocType::LinkPlaceholder {
                debug!(document = document.id, "removing placeholder document");
                store.delete_document(document.id)?;
            }
        }

        Ok(())
    }
}
