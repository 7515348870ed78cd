mod class_plugin;
mod class_preference;
mod db_schema;
mod frontend_asset;
mod layout;

use std::path::Path;

pub use class_plugin::{ClassPluginCheck, PLUGIN_CATEGORY};
pub use class_preference::{ClassPreferenceCheck, PREFERENCE_CATEGORY};
pub use db_schema::{DB_SCHEMA_CATEGORY, DbSchemaCheck};
pub use frontend_asset::{FrontendAssetCheck, OVERRIDE_CATEGORY};
pub use layout::{LAYOUT_EXTENSION_CATEGORY, LAYOUT_OVERRIDE_CATEGORY, LayoutOverrideCheck};

use patch_helper_core::{CheckResults, PatchEntry};
use patch_helper_host::MAGENTO_VENDOR_PREFIX;

use crate::error::CheckError;
use crate::resolver::AppPathResult;
use crate::traits::HostMetadata;

/// Everything a check may look at for one patch entry.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub host: &'a dyn HostMetadata,
    pub entry: &'a PatchEntry,
    pub resolved: &'a AppPathResult,
}

impl CheckContext<'_> {
    /// The normalized vendor path, falling back to the entry's own path.
    #[must_use]
    pub fn vendor_path(&self) -> &str {
        self.resolved
            .vendor_path()
            .unwrap_or_else(|| self.entry.path())
    }

    /// Whether `candidate` may be reported as an override of this entry.
    ///
    /// Core Magento locations, the changed file itself and ignored paths are
    /// never overrides.
    #[must_use]
    pub fn is_reportable_override(&self, candidate: &str) -> bool {
        candidate != self.vendor_path()
            && !candidate.starts_with(MAGENTO_VENDOR_PREFIX)
            && !self.host.is_ignored_override_path(candidate)
    }
}

pub trait Check {
    /// Stable name used in logs and failure notes.
    fn name(&self) -> &'static str;

    /// Whether the check applies to the entry. Must not touch the filesystem.
    fn can_check(&self, context: &CheckContext<'_>) -> bool;

    /// # Errors
    ///
    /// Returns an error if the host cannot be inspected; findings already
    /// recorded in `results` are discarded by the runner.
    fn check(&self, context: &CheckContext<'_>, results: &mut CheckResults) -> Result<(), CheckError>;
}

/// Whether a project-relative file exists below `root`.
///
/// # Errors
///
/// Returns an error for failures other than the file being absent.
pub fn file_exists(root: &Path, relative: &str) -> Result<bool, CheckError> {
    let path = root.join(relative);
    match std::fs::metadata(&path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(CheckError::Io { path, source }),
    }
}
