//! Bundle import translation

use std::collections::BTreeMap;

use crate::archive::Metadata;
use crate::definition::ParsedRoot;
use crate::domain::{BundledCoordinator, JobKey, JobKind, JobPayload, JobRecord};
use crate::error::{Result, malformed_definition, store_write_failed, unresolved_reference};
use crate::store::Store;
use crate::translator::Translator;

/// Translates bundle definitions: resolves the coordinator set and attaches
/// each with its coordination parameters
#[derive(Debug, Default)]
pub struct BundleTranslator;

impl Translator for BundleTranslator {
    fn translate(
        &self,
        store: &mut dyn Store,
        record: &mut JobRecord,
        root: &ParsedRoot,
        metadata: &Metadata,
    ) -> Result<()> {
        let mut attached = Vec::new();

        for child in root.children() {
            if child.tag != "coordinator" {
                continue;
            }
            let name = child.name().ok_or_else(|| {
                malformed_definition(&record.name, "<coordinator> reference without name")
            })?;

            let coordinator = store
                .find_job(JobKind::Coordinator, &JobKey::named(name))?
                .ok_or_else(|| unresolved_reference("coordinator", name, &record.name))?;

            let mut parameters: BTreeMap<String, String> = child
                .attributes()
                .iter()
                .filter(|(k, _)| k != "name")
                .cloned()
                .collect();
            let prefix = format!("coordinator.{name}.");
            for (key, value) in metadata.with_prefix(&prefix) {
                parameters.insert(key.to_string(), value.to_string());
            }

            attached.push(BundledCoordinator {
                coordinator: coordinator.id,
                name: name.to_string(),
                parameters,
            });
        }

        {
            let JobPayload::Bundle(payload) = &mut record.payload else {
                return Err(store_write_failed(format!(
                    "record '{}' is not a bundle",
                    record.name
                )));
            };
            payload.kickoff = root
                .attr("kick-off-time")
                .or_else(|| metadata.get("kick-off-time"))
                .map(str::to_string);
            payload.attached = attached;
        }

        store.update_job(record)
    }
}
