//! Document tree reconciliation
//!
//! After installation every example document must live in the owner's
//! examples directory. Documents that were never filed, and documents the
//! user trashed, are restored there. Documents the user moved into their
//! own folders are left alone; reorganized user data is never overridden.

use tracing::{debug, info};

use crate::context::InstallContext;
use crate::domain::{DocumentId, SharePermission};
use crate::error::Result;
use crate::store::Store;

/// Name of the per-owner home directory
pub const HOME_DIR: &str = "home";

/// Name of the canonical examples directory under the home directory
pub const EXAMPLES_DIR: &str = "examples";

/// Results of a reconciliation pass
#[derive(Debug)]
pub struct ReconcileReport {
    /// The owner's examples directory
    pub examples_dir: DocumentId,
    /// Names of documents restored into the examples directory
    pub restored: Vec<String>,
}

/// Place detached example documents into the examples directory and share
/// it with the default group
///
/// Both directory lookups are get-or-create; a directory surviving from a
/// prior run wins over creating a new one. The sharing grant is idempotent.
pub fn reconcile(store: &mut dyn Store, ctx: &InstallContext) -> Result<ReconcileReport> {
    let home = store.get_or_create_directory(&ctx.user, None, HOME_DIR)?;
    let examples = store.get_or_create_directory(&ctx.user, Some(home.id), EXAMPLES_DIR)?;

    let mut restored = Vec::new();
    for mut document in store.documents()? {
        if document.owner != ctx.user.name || !document.doc_type.is_example() {
            continue;
        }
        if !document.is_detached() {
            // Filed somewhere by the user (or already reconciled); leave it
            debug!(name = %document.name, "document already organized");
            continue;
        }

        info!(name = %document.name, "restoring document into examples directory");
        document.parent = Some(examples.id);
        document.trashed = false;
        store.update_document(&document)?;
        restored.push(document.name);
    }

    store.grant_share(examples.id, SharePermission::Read, &ctx.group)?;
    info!(group = %ctx.group, "examples directory shared read-only");

    Ok(ReconcileReport {
        examples_dir: examples.id,
        restored,
    })
}
