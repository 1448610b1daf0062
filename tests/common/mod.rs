//! Common test utilities for Jobseed integration tests

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

/// A fully laid-out test deployment: config, catalog, samples and store
#[allow(dead_code)]
pub struct TestDeployment {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to deployment root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestDeployment {
    /// Create a new deployment with config, empty catalog and sample dirs
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let deployment = Self { temp, path };

        deployment.write_file(
            "jobseed.yaml",
            "catalog_dir: catalog\n\
             sample_dir: samples\n\
             sample_data_dir: data\n\
             remote_root: /user/jobseed/examples\n\
             remote_fs_root: remote\n\
             store_dir: store\n\
             install_user: jobseed\n\
             default_group: default\n",
        );
        std::fs::create_dir_all(deployment.path.join("samples"))
            .expect("Failed to create samples directory");
        std::fs::create_dir_all(deployment.path.join("data"))
            .expect("Failed to create data directory");
        deployment
    }

    /// Populate the sample directories with binary stand-ins
    pub fn seed_samples(&self) {
        self.write_file("samples/sleep/lib/sleep.jar", "jar bytes");
        self.write_file("samples/terasort/lib/terasort.jar", "jar bytes");
        self.write_file("data/records.txt", "1,one\n2,two\n");
    }

    /// Add a workflow archive to a catalog entry
    pub fn add_workflow(&self, entry: &str, xml: &str) {
        self.add_entry("catalog", entry, "workflow.tar.gz", "workflow.xml", xml, "{}");
    }

    /// Add an unmanaged workflow archive to a catalog entry
    pub fn add_unmanaged_workflow(&self, entry: &str, xml: &str) {
        self.add_entry("catalog/unmanaged", entry, "workflow.tar.gz", "workflow.xml", xml, "{}");
    }

    /// Add a coordinator archive to a catalog entry
    pub fn add_coordinator(&self, entry: &str, xml: &str) {
        self.add_entry(
            "catalog",
            entry,
            "coordinator.tar.gz",
            "coordinator.xml",
            xml,
            "{}",
        );
    }

    /// Add a bundle archive to a catalog entry
    pub fn add_bundle(&self, entry: &str, xml: &str) {
        self.add_entry("catalog", entry, "bundle.tar.gz", "bundle.xml", xml, "{}");
    }

    /// Add a catalog entry with explicit metadata
    pub fn add_entry(
        &self,
        catalog: &str,
        entry: &str,
        archive_name: &str,
        member_name: &str,
        xml: &str,
        metadata: &str,
    ) {
        let dir = self.path.join(catalog).join(entry);
        std::fs::create_dir_all(&dir).expect("Failed to create catalog entry directory");
        build_archive(
            &dir.join(archive_name),
            &[(member_name, xml), ("metadata.json", metadata)],
        );
    }

    /// Write a file in the deployment
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the deployment
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the deployment
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Parse a store state file
    pub fn store_records(&self, file: &str) -> Vec<serde_json::Value> {
        let content = self.read_file(&format!("store/{file}"));
        serde_json::from_str(&content).expect("Failed to parse store state file")
    }

    /// Installed job records from the store
    pub fn jobs(&self) -> Vec<serde_json::Value> {
        self.store_records("jobs.json")
    }

    /// Document records from the store
    pub fn documents(&self) -> Vec<serde_json::Value> {
        self.store_records("documents.json")
    }

    /// Sharing grants from the store
    pub fn shares(&self) -> Vec<serde_json::Value> {
        self.store_records("shares.json")
    }

    /// An assert_cmd command for the jobseed binary, rooted in this deployment
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("jobseed").expect("jobseed binary");
        cmd.current_dir(&self.path);
        cmd.env_remove("JOBSEED_CONFIG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run `jobseed install --no-progress` and expect success
    pub fn install_ok(&self) -> assert_cmd::assert::Assert {
        self.command().args(["install", "--no-progress"]).assert().success()
    }
}

/// Build a gzip-compressed tar archive from named members
#[allow(dead_code)]
pub fn build_archive(path: &Path, members: &[(&str, &str)]) {
    let file = File::create(path).expect("Failed to create archive file");
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .expect("Failed to append archive member");
    }
    builder
        .into_inner()
        .expect("Failed to finish tar")
        .finish()
        .expect("Failed to finish gzip");
}

/// A small, valid workflow definition
#[allow(dead_code)]
pub fn sleep_workflow_xml(name: &str) -> String {
    format!(
        r#"<workflow name="{name}" xmlns="uri:jobseed:workflow:0.4">
    <action name="sleep-1" type="shell" ok="sleep-2" error="fail"/>
    <action name="sleep-2" type="shell" ok="end" error="fail"/>
    <kill name="fail"/>
</workflow>"#
    )
}
