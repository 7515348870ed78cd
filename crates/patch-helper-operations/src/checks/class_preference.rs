use indexmap::IndexSet;
use patch_helper_core::{Area, CheckResults};

use super::{Check, CheckContext};
use crate::error::CheckError;
use crate::resolver::{class_file, class_name};

pub const PREFERENCE_CATEGORY: &str = "Preference";

const MAGENTO_NAMESPACE: &str = "Magento\\";

/// Third-party classes configured as a preference for a changed class.
#[derive(Debug, Default)]
pub struct ClassPreferenceCheck;

impl Check for ClassPreferenceCheck {
    fn name(&self) -> &'static str {
        "class-preference"
    }

    fn can_check(&self, context: &CheckContext<'_>) -> bool {
        context.entry.extension() == Some("php") && context.resolved.app_path().is_some()
    }

    fn check(&self, context: &CheckContext<'_>, results: &mut CheckResults) -> Result<(), CheckError> {
        let Some(app_path) = context.resolved.app_path() else {
            return Ok(());
        };
        let class = class_name(app_path)?;

        let mut preferences = IndexSet::new();
        for area in Area::CONFIG_AREAS {
            let Some(preference) = context
                .host
                .area_config(area)
                .and_then(|config| config.preference_for(&class))
            else {
                continue;
            };
            if preference == class || preference.starts_with(MAGENTO_NAMESPACE) {
                continue;
            }
            let reported = class_file(context.host, preference)
                .unwrap_or_else(|| preference.to_string());
            preferences.insert(reported);
        }

        for preference in preferences {
            results.add_warning(PREFERENCE_CATEGORY, preference);
        }
        Ok(())
    }
}
