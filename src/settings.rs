//! Configuration file handling (`jobseed.yaml`)
//!
//! All paths in the file may be relative; they are resolved against the
//! directory the configuration was loaded from (or the current directory
//! when running on built-in defaults).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JobseedError, Result, config_not_found, config_parse_failed};

/// Default configuration file name, looked up in the current directory
pub const CONFIG_FILE: &str = "jobseed.yaml";

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Catalog root holding one subdirectory per example, each with one
    /// definition archive per kind present, plus an `unmanaged/` subtree
    pub catalog_dir: PathBuf,

    /// Local directory of example binaries, one child directory per example
    pub sample_dir: PathBuf,

    /// Local directory of sample data files
    pub sample_data_dir: PathBuf,

    /// Remote directory the samples are staged under
    pub remote_root: String,

    /// Local root directory backing the mirror remote filesystem
    pub remote_fs_root: PathBuf,

    /// Directory the document store keeps its state files in
    pub store_dir: PathBuf,

    /// Principal the pipeline installs and stages as
    pub install_user: String,

    /// Group the examples directory is shared with
    pub default_group: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from("catalog"),
            sample_dir: PathBuf::from("samples"),
            sample_data_dir: PathBuf::from("data"),
            remote_root: "/user/jobseed/examples".to_string(),
            remote_fs_root: PathBuf::from("remote"),
            store_dir: default_store_dir(),
            install_user: "jobseed".to_string(),
            default_group: "default".to_string(),
        }
    }
}

/// Store location used when no configuration file sets one
fn default_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("jobseed").join("store"))
        .unwrap_or_else(|| PathBuf::from(".jobseed-store"))
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        Ok(settings)
    }

    /// Load settings from a file, resolving relative paths against its parent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(config_not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| JobseedError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut settings = Self::from_yaml(&content)
            .map_err(|e| config_parse_failed(path.display().to_string(), e.to_string()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        settings.resolve_paths(base);
        settings.validate()?;
        Ok(settings)
    }

    /// Load an explicit config file, or fall back to `jobseed.yaml` in the
    /// working directory, or to built-in defaults when neither exists
    pub fn load_or_default(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit = working_dir.join(CONFIG_FILE);
        if implicit.is_file() {
            return Self::load(&implicit);
        }
        let mut settings = Self::default();
        settings.resolve_paths(working_dir);
        Ok(settings)
    }

    /// Resolve relative paths against a base directory
    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.catalog_dir,
            &mut self.sample_dir,
            &mut self.sample_data_dir,
            &mut self.remote_fs_root,
            &mut self.store_dir,
        ] {
            if path.is_relative() {
                *path = base.join(path.as_path());
            }
        }
    }

    /// Validate field-level invariants
    pub fn validate(&self) -> Result<()> {
        if self.install_user.is_empty() {
            return Err(config_parse_failed(
                CONFIG_FILE,
                "install_user must not be empty",
            ));
        }
        if self.default_group.is_empty() {
            return Err(config_parse_failed(
                CONFIG_FILE,
                "default_group must not be empty",
            ));
        }
        if !self.remote_root.starts_with('/') {
            return Err(config_parse_failed(
                CONFIG_FILE,
                "remote_root must be an absolute remote path",
            ));
        }
        Ok(())
    }

    /// Catalog subtree of unmanaged workflow entries
    ///
    /// Its entries install with `managed = false`; the directory itself is
    /// not an example entry of the main catalog.
    pub fn unmanaged_dir(&self) -> PathBuf {
        self.catalog_dir.join("unmanaged")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.install_user, "jobseed");
        assert_eq!(settings.remote_root, "/user/jobseed/examples");
        assert_eq!(settings.catalog_dir, PathBuf::from("catalog"));
    }

    #[test]
    fn test_from_yaml_partial() {
        let settings = Settings::from_yaml("install_user: sample\nremote_root: /srv/examples\n")
            .expect("partial yaml should parse with defaults");
        assert_eq!(settings.install_user, "sample");
        assert_eq!(settings.remote_root, "/srv/examples");
        assert_eq!(settings.default_group, "default");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = Settings::from_yaml("no_such_field: 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        std::fs::write(&path, "catalog_dir: my-catalog\nstore_dir: state\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.catalog_dir, temp.path().join("my-catalog"));
        assert_eq!(settings.store_dir, temp.path().join("state"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Settings::load(Path::new("/nonexistent/jobseed.yaml"));
        assert!(matches!(result, Err(JobseedError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_validate_rejects_relative_remote_root() {
        let mut settings = Settings::default();
        settings.remote_root = "examples".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_or_default_without_config() {
        let temp = tempfile::TempDir::new().unwrap();
        let settings = Settings::load_or_default(None, temp.path()).unwrap();
        assert_eq!(settings.catalog_dir, temp.path().join("catalog"));
    }

    #[test]
    fn test_unmanaged_subtree() {
        let settings = Settings::default();
        assert!(settings.unmanaged_dir().ends_with("catalog/unmanaged"));
    }
}
