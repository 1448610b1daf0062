//! Mirror filesystem backed by a local directory
//!
//! Remote paths map verbatim under a root directory on local disk. Good
//! enough for single-host deployments and for tests; a networked backend
//! implements the same trait elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::Principal;
use crate::error::{Result, io_error};
use crate::remote::RemoteFs;

/// [`RemoteFs`] implementation mapping remote paths under a local root
#[derive(Debug)]
pub struct MirrorFs {
    root: PathBuf,
    impersonations: Vec<String>,
}

impl MirrorFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            impersonations: Vec::new(),
        }
    }

    /// Map a remote path to its backing location
    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Principals `copy_as_user` has acted as, in call order
    #[allow(dead_code)]
    pub fn impersonations(&self) -> &[String] {
        &self.impersonations
    }
}

fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    if src.is_file() {
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(src, dst)?;
        return Ok(());
    }

    for entry in WalkDir::new(src) {
        let entry = entry.map_err(std::io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(std::io::Error::other)?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

impl RemoteFs for MirrorFs {
    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.resolve(path).exists())
    }

    fn list_children(&self, path: &str) -> Result<Vec<String>> {
        let dir = self.resolve(path);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    fn mkdir_p(&mut self, path: &str) -> Result<()> {
        let dir = self.resolve(path);
        debug!(remote = path, backing = %dir.display(), "mkdir");
        fs::create_dir_all(&dir)?;
        Ok(())
    }

    fn copy_as_user(&mut self, user: &Principal, local: &Path, remote: &str) -> Result<()> {
        if !local.exists() {
            return Err(io_error(format!(
                "local path does not exist: {}",
                local.display()
            )));
        }

        info!(user = %user, local = %local.display(), remote, "copying as user");
        self.impersonations.push(user.name.clone());

        let target = self.resolve(remote);
        copy_tree(local, &target)?;
        Ok(())
    }
}
