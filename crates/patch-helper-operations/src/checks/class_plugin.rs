use indexmap::IndexSet;
use patch_helper_core::{Area, CheckResults};

use super::{Check, CheckContext};
use crate::error::CheckError;
use crate::php::affected_interceptable_functions;
use crate::resolver::class_name;

pub const PLUGIN_CATEGORY: &str = "Plugin override";

const INTERCEPTOR_PREFIXES: [&str; 3] = ["before", "around", "after"];

fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Enabled plugins intercepting a method the patch changes.
#[derive(Debug, Default)]
pub struct ClassPluginCheck;

impl Check for ClassPluginCheck {
    fn name(&self) -> &'static str {
        "class-plugin"
    }

    fn can_check(&self, context: &CheckContext<'_>) -> bool {
        context.entry.extension() == Some("php") && context.resolved.app_path().is_some()
    }

    fn check(&self, context: &CheckContext<'_>, results: &mut CheckResults) -> Result<(), CheckError> {
        let Some(app_path) = context.resolved.app_path() else {
            return Ok(());
        };
        let class = class_name(app_path)?;
        let functions = affected_interceptable_functions(context.entry);
        if functions.is_empty() {
            return Ok(());
        }

        let interceptors: Vec<String> = functions
            .iter()
            .flat_map(|function| {
                let suffix = upper_first(function);
                INTERCEPTOR_PREFIXES
                    .iter()
                    .map(move |prefix| format!("{prefix}{suffix}"))
            })
            .collect();

        let mut findings = IndexSet::new();
        for area in Area::CONFIG_AREAS {
            let Some(config) = context.host.area_config(area) else {
                continue;
            };
            for plugin in config.plugins_for(&class) {
                if plugin.disabled {
                    continue;
                }
                for method in &plugin.methods {
                    if interceptors.iter().any(|name| name.eq_ignore_ascii_case(method)) {
                        findings.insert(format!("{}::{method}", plugin.instance));
                    }
                }
            }
        }

        for finding in findings {
            results.add_warning(PLUGIN_CATEGORY, finding);
        }
        Ok(())
    }
}
