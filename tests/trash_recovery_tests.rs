//! Trash recovery and user-intent preservation during reconciliation

mod common;

use common::{TestDeployment, sleep_workflow_xml};

fn edit_documents<F>(deployment: &TestDeployment, edit: F)
where
    F: FnOnce(&mut Vec<serde_json::Value>),
{
    let mut documents: Vec<serde_json::Value> =
        serde_json::from_str(&deployment.read_file("store/documents.json")).unwrap();
    edit(&mut documents);
    deployment.write_file(
        "store/documents.json",
        &serde_json::to_string_pretty(&documents).unwrap(),
    );
}

#[test]
fn test_detached_document_restored_on_rerun() {
    let deployment = TestDeployment::new();
    deployment.seed_samples();
    deployment.add_workflow("sleep", &sleep_workflow_xml("sleep-example"));
    deployment.install_ok();

    // Detach the workflow document, as trashing does
    edit_documents(&deployment, |documents| {
        for doc in documents.iter_mut() {
            if doc["name"] == "sleep-example" && doc["doc_type"] == "workflow" {
                doc["parent"] = serde_json::Value::Null;
            }
        }
    });

    deployment.install_ok();

    let documents = deployment.documents();
    let examples_dir = documents
        .iter()
        .find(|d| d["doc_type"] == "directory" && d["name"] == "examples")
        .unwrap();
    let restored = documents
        .iter()
        .find(|d| d["name"] == "sleep-example" && d["doc_type"] == "workflow")
        .unwrap();
    assert_eq!(restored["parent"], examples_dir["id"]);
}

#[test]
fn test_trashed_flag_cleared_on_rerun() {
    let deployment = TestDeployment::new();
    deployment.seed_samples();
    deployment.install_ok();

    edit_documents(&deployment, |documents| {
        for doc in documents.iter_mut() {
            if doc["name"] == "Sleep Job" {
                doc["trashed"] = serde_json::Value::Bool(true);
            }
        }
    });

    deployment.install_ok();

    let documents = deployment.documents();
    let recovered = documents.iter().find(|d| d["name"] == "Sleep Job").unwrap();
    assert_eq!(recovered["trashed"], false);
}

#[test]
fn test_user_moved_document_left_alone() {
    let deployment = TestDeployment::new();
    deployment.seed_samples();
    deployment.add_workflow("sleep", &sleep_workflow_xml("sleep-example"));
    deployment.install_ok();

    // Simulate the user filing the example into their own folder
    let custom_dir_id = 9000u64;
    edit_documents(&deployment, |documents| {
        documents.push(serde_json::json!({
            "id": custom_dir_id,
            "name": "MyCustomFolder",
            "doc_type": "directory",
            "owner": "jobseed",
            "parent": null,
            "trashed": false,
            "data": null
        }));
        for doc in documents.iter_mut() {
            if doc["name"] == "sleep-example" && doc["doc_type"] == "workflow" {
                doc["parent"] = serde_json::json!(custom_dir_id);
            }
        }
    });

    deployment.install_ok();

    let documents = deployment.documents();
    let moved = documents
        .iter()
        .find(|d| d["name"] == "sleep-example" && d["doc_type"] == "workflow")
        .unwrap();
    assert_eq!(moved["parent"], serde_json::json!(custom_dir_id));
}
