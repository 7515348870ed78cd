use indexmap::IndexSet;
use patch_helper_core::CheckResults;
use tracing::debug;

use super::{Check, CheckContext, file_exists};
use crate::error::CheckError;
use crate::resolver::{asset_request, theme_override_candidates};

pub const OVERRIDE_CATEGORY: &str = "Override (phtml/js/html)";

const EXTENSIONS: [&str; 3] = ["js", "phtml", "html"];

/// Theme files that shadow a changed module JavaScript, template or
/// knockout/email HTML file.
#[derive(Debug, Default)]
pub struct FrontendAssetCheck;

impl Check for FrontendAssetCheck {
    fn name(&self) -> &'static str {
        "frontend-asset"
    }

    fn can_check(&self, context: &CheckContext<'_>) -> bool {
        context
            .entry
            .extension()
            .is_some_and(|ext| EXTENSIONS.contains(&ext))
            && asset_request(context.resolved).is_some()
    }

    fn check(&self, context: &CheckContext<'_>, results: &mut CheckResults) -> Result<(), CheckError> {
        let Some(request) = asset_request(context.resolved) else {
            return Ok(());
        };
        let vendor_path = context.vendor_path();
        if context.host.is_ignored_override_path(vendor_path) {
            debug!(path = vendor_path, "changed file is ignored for theme overrides");
            return Ok(());
        }

        let mut overrides = IndexSet::new();
        for candidate in theme_override_candidates(context.host, &request) {
            if !context.is_reportable_override(&candidate) {
                continue;
            }
            if file_exists(context.host.root(), &candidate)? {
                overrides.insert(candidate);
            }
        }

        for path in overrides {
            results.add_warning(OVERRIDE_CATEGORY, path);
        }
        Ok(())
    }
}
