//! Built-in editor example jobs
//!
//! Besides the catalog archives, the pipeline ships two notebook-style
//! editor documents: a sleep job and a terasort-style batch job. They are
//! plain documents rather than job records, installed with the same
//! existence-check and cleanup discipline as everything else.

use tracing::{info, warn};

use crate::context::InstallContext;
use crate::domain::{DocType, NewDocument};
use crate::error::Result;
use crate::installer::{EntryOutcome, InstallReport};
use crate::store::Store;

/// One built-in editor example
struct EditorExample {
    name: &'static str,
    doc_type: DocType,
    description: &'static str,
    snippet: fn(&str) -> serde_json::Value,
}

fn sleep_snippet(remote_root: &str) -> serde_json::Value {
    serde_json::json!({
        "app_jar": format!("{remote_root}/lib/examples.jar"),
        "main_class": "examples.SleepJob",
        "job_properties": [
            "map.sleep.time=5",
            "reduce.sleep.time=10",
            "mappers=1",
            "reducers=1"
        ],
        "archives": [],
        "jars": []
    })
}

fn terasort_snippet(remote_root: &str) -> serde_json::Value {
    serde_json::json!({
        "app_jar": format!("{remote_root}/lib/examples.jar"),
        "main_class": "examples.terasort.TeraSort",
        "args": "${output_dir}/teragen ${output_dir}/terasort",
        "java_opts": "",
        "archives": [],
        "files": []
    })
}

const EXAMPLES: &[EditorExample] = &[
    EditorExample {
        name: "Sleep Job",
        doc_type: DocType::QueryMapreduce,
        description: "Sleep: example batch job",
        snippet: sleep_snippet,
    },
    EditorExample {
        name: "Terasort Job",
        doc_type: DocType::QueryJava,
        description: "Terasort: example Java job",
        snippet: terasort_snippet,
    },
];

/// Install the built-in editor examples
///
/// Idempotent like the catalog installs; an existing document of the same
/// owner, name and type is left untouched.
pub fn install_editor_examples(
    store: &mut dyn Store,
    ctx: &InstallContext,
    remote_root: &str,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();

    for example in EXAMPLES {
        match install_one(store, ctx, example, remote_root) {
            Ok(outcome) => report.record(example.name, outcome),
            Err(err) => {
                warn!(name = example.name, error = %err, "editor example failed");
                report.record_failure(example.name, err);
            }
        }
    }

    Ok(report)
}

fn install_one(
    store: &mut dyn Store,
    ctx: &InstallContext,
    example: &EditorExample,
    remote_root: &str,
) -> Result<EntryOutcome> {
    if store
        .find_document(&ctx.user.name, example.name, example.doc_type)?
        .is_some()
    {
        info!(name = example.name, "editor example already installed");
        return Ok(EntryOutcome::AlreadyInstalled);
    }

    info!(name = example.name, "installing editor example");

    store.begin()?;
    let created = store.create_document(NewDocument {
        name: example.name.to_string(),
        doc_type: example.doc_type,
        owner: ctx.user.name.clone(),
        parent: None,
        data: serde_json::json!({
            "description": example.description,
            "status": "ready",
            "is_saved": true,
            "snippet": (example.snippet)(remote_root),
        }),
    });

    match created.and_then(|_| store.commit()) {
        Ok(()) => Ok(EntryOutcome::Installed),
        Err(err) => {
            if store.supports_atomic_transaction() {
                store.rollback()?;
            } else if let Some(partial) =
                store.find_document(&ctx.user.name, example.name, example.doc_type)?
            {
                // No rollback available; remove the partial document
                store.delete_document(partial.id)?;
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::store::MemoryStore;

    fn ctx() -> InstallContext {
        InstallContext::from_settings(&Settings::default())
    }

    #[test]
    fn test_both_examples_installed() {
        let mut store = MemoryStore::new();
        let report =
            install_editor_examples(&mut store, &ctx(), "/user/jobseed/examples").unwrap();

        assert_eq!(report.installed.len(), 2);
        assert!(
            store
                .find_document("jobseed", "Sleep Job", DocType::QueryMapreduce)
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .find_document("jobseed", "Terasort Job", DocType::QueryJava)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_second_run_skips() {
        let mut store = MemoryStore::new();
        let ctx = ctx();
        install_editor_examples(&mut store, &ctx, "/srv/examples").unwrap();
        let report = install_editor_examples(&mut store, &ctx, "/srv/examples").unwrap();

        assert!(report.installed.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(store.documents().unwrap().len(), 2);
    }

    #[test]
    fn test_snippet_references_remote_jar() {
        let mut store = MemoryStore::new();
        install_editor_examples(&mut store, &ctx(), "/srv/examples").unwrap();

        let doc = store
            .find_document("jobseed", "Sleep Job", DocType::QueryMapreduce)
            .unwrap()
            .unwrap();
        let jar = doc.data["snippet"]["app_jar"].as_str().unwrap();
        assert_eq!(jar, "/srv/examples/lib/examples.jar");
    }

    #[test]
    fn test_examples_start_detached() {
        let mut store = MemoryStore::new();
        install_editor_examples(&mut store, &ctx(), "/srv/examples").unwrap();

        for doc in store.documents().unwrap() {
            assert!(doc.parent.is_none());
        }
    }
}
