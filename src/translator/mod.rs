//! Import translators
//!
//! A translator materializes a parsed definition into the child structure
//! of an already-created job record: actions and control-flow edges for
//! workflows, the workflow reference and trigger attributes for
//! coordinators, the coordinator set for bundles. Translators never create
//! the owning record; that is the installer's job.

mod bundle;
mod coordinator;
mod workflow;

pub use bundle::BundleTranslator;
pub use coordinator::CoordinatorTranslator;
pub use workflow::WorkflowTranslator;

use crate::archive::Metadata;
use crate::definition::ParsedRoot;
use crate::domain::JobRecord;
use crate::error::Result;
use crate::store::Store;

/// Common contract over the three definition kinds
pub trait Translator {
    /// Populate `record`'s child structure from the parsed definition
    ///
    /// `record` has been created (and, for workflows, initialized) inside
    /// the installer's transaction scope. Fails with `UnresolvedReference`
    /// when a named dependency does not exist in the store; the installer
    /// scopes that failure to the one catalog entry.
    fn translate(
        &self,
        store: &mut dyn Store,
        record: &mut JobRecord,
        root: &ParsedRoot,
        metadata: &Metadata,
    ) -> Result<()>;
}
