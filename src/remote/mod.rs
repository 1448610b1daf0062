//! Remote filesystem interface
//!
//! The stager only needs four operations, all synchronous. The concrete
//! backend is a deployment concern; this crate ships [`MirrorFs`], which
//! maps remote paths under a local root directory.

mod mirror;

pub use mirror::MirrorFs;

use std::path::Path;

use crate::domain::Principal;
use crate::error::Result;

/// Filesystem interface consumed by the remote stager
pub trait RemoteFs {
    /// Whether a remote path exists
    #[allow(dead_code)]
    fn exists(&self, path: &str) -> Result<bool>;

    /// Names of the direct children of a remote directory, sorted
    #[allow(dead_code)]
    fn list_children(&self, path: &str) -> Result<Vec<String>>;

    /// Create a remote directory and its parents
    fn mkdir_p(&mut self, path: &str) -> Result<()>;

    /// Copy a local file or directory tree to a remote path, acting as the
    /// given principal
    ///
    /// The stager never authenticates; impersonation is the backend's
    /// capability.
    fn copy_as_user(&mut self, user: &Principal, local: &Path, remote: &str) -> Result<()>;
}

/// Join a child name onto a remote path
pub fn remote_join(root: &str, name: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_join() {
        assert_eq!(remote_join("/srv/examples", "data"), "/srv/examples/data");
        assert_eq!(remote_join("/srv/examples/", "data"), "/srv/examples/data");
    }
}
