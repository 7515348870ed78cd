use indexmap::IndexSet;
use patch_helper_core::{Area, CheckResults};

use super::{Check, CheckContext};
use crate::error::CheckError;

pub const LAYOUT_OVERRIDE_CATEGORY: &str = "Layout override";
pub const LAYOUT_EXTENSION_CATEGORY: &str = "Layout extension";

const LAYOUT_DIRECTORIES: [&str; 2] = ["layout", "page_layout"];

/// A changed layout file: `view/<area>/<directory>/<file>`.
struct LayoutFile<'a> {
    area: Area,
    directory: &'a str,
    file: &'a str,
}

fn layout_file<'a>(context: &CheckContext<'a>) -> Option<LayoutFile<'a>> {
    let (area, below_area) = Area::split_view_path(context.resolved.module_subpath()?)?;
    let (directory, file) = below_area.split_once('/')?;
    if !LAYOUT_DIRECTORIES.contains(&directory) || file.is_empty() {
        return None;
    }
    Some(LayoutFile {
        area,
        directory,
        file,
    })
}

/// Theme and module layout files that replace or extend a changed layout.
///
/// Replacements (`override/base`, `override/theme/<ancestor>`) are warnings;
/// theme merge files that only extend the layout are infos. Existence is
/// answered from the host's XML file inventory.
#[derive(Debug, Default)]
pub struct LayoutOverrideCheck;

impl Check for LayoutOverrideCheck {
    fn name(&self) -> &'static str {
        "layout-override"
    }

    fn can_check(&self, context: &CheckContext<'_>) -> bool {
        context.entry.extension() == Some("xml") && layout_file(context).is_some()
    }

    fn check(&self, context: &CheckContext<'_>, results: &mut CheckResults) -> Result<(), CheckError> {
        let (Some(layout), Some(module)) = (layout_file(context), context.resolved.module()) else {
            return Ok(());
        };
        let exists = |candidate: &str| {
            context
                .host
                .xml_files()
                .binary_search_by(|file| file.as_str().cmp(candidate))
                .is_ok()
                && context.is_reportable_override(candidate)
        };

        let mut overrides = IndexSet::new();
        let mut extensions = IndexSet::new();
        for &area in layout.area.theme_areas() {
            for theme in context.host.custom_themes(area) {
                let base = format!("{}/{module}/{}", theme.path, layout.directory);

                let candidate = format!("{base}/override/base/{}", layout.file);
                if exists(&candidate) {
                    overrides.insert(candidate);
                }
                for ancestor in context.host.theme_ancestry(theme).iter().skip(1) {
                    let candidate =
                        format!("{base}/override/theme/{}/{}", ancestor.code, layout.file);
                    if exists(&candidate) {
                        overrides.insert(candidate);
                    }
                }

                let candidate = format!("{base}/{}", layout.file);
                if exists(&candidate) {
                    extensions.insert(candidate);
                }
            }
        }

        for found in context.host.paths_to_modules().iter() {
            if found.name == module {
                continue;
            }
            let candidate = format!(
                "{}view/{}/{}/override/base/{}",
                found.prefix, layout.area, layout.directory, layout.file
            );
            if exists(&candidate) {
                overrides.insert(candidate);
            }
        }

        for path in overrides {
            results.add_warning(LAYOUT_OVERRIDE_CATEGORY, path);
        }
        for path in extensions {
            results.add_info(LAYOUT_EXTENSION_CATEGORY, path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use patch_helper_core::PatchEntry;

    use super::*;
    use crate::mocks::MockHost;
    use crate::resolver::resolve_app_path;

    const LAYOUT: &str = "vendor/magento/module-checkout/view/frontend/layout/checkout_index_index.xml";

    fn run(host: &MockHost, path: &str) -> CheckResults {
        let entry = PatchEntry::new(Some(path.to_string()), Some(path.to_string()), Vec::new(), Vec::new())
            .expect("entry has paths");
        let resolved = resolve_app_path(path, host);
        let context = CheckContext {
            host,
            entry: &entry,
            resolved: &resolved,
        };
        let mut results = CheckResults::new();
        if LayoutOverrideCheck.can_check(&context) {
            LayoutOverrideCheck
                .check(&context, &mut results)
                .expect("layout check reads only the inventory");
        }
        results
    }

    fn host() -> MockHost {
        MockHost::new()
            .with_module("vendor/magento/module-checkout/", "Magento_Checkout")
            .with_module("app/code/Acme/Checkout/", "Acme_Checkout")
            .with_theme("Magento/luma", Area::Frontend, "vendor/magento/theme-frontend-luma", None)
            .with_theme(
                "Acme/theme",
                Area::Frontend,
                "app/design/frontend/Acme/theme",
                Some("Magento/luma"),
            )
    }

    #[test]
    fn reports_overrides_and_extensions() {
        let host = host()
            .with_xml_file("app/design/frontend/Acme/theme/Magento_Checkout/layout/checkout_index_index.xml")
            .with_xml_file(
                "app/design/frontend/Acme/theme/Magento_Checkout/layout/override/base/checkout_index_index.xml",
            )
            .with_xml_file(
                "app/design/frontend/Acme/theme/Magento_Checkout/layout/override/theme/Magento/luma/checkout_index_index.xml",
            )
            .with_xml_file(
                "app/code/Acme/Checkout/view/frontend/layout/override/base/checkout_index_index.xml",
            );

        let results = run(&host, LAYOUT);

        assert_eq!(
            results.warnings()[LAYOUT_OVERRIDE_CATEGORY],
            vec![
                "app/design/frontend/Acme/theme/Magento_Checkout/layout/override/base/checkout_index_index.xml",
                "app/design/frontend/Acme/theme/Magento_Checkout/layout/override/theme/Magento/luma/checkout_index_index.xml",
                "app/code/Acme/Checkout/view/frontend/layout/override/base/checkout_index_index.xml",
            ]
        );
        assert_eq!(
            results.infos()[LAYOUT_EXTENSION_CATEGORY],
            vec!["app/design/frontend/Acme/theme/Magento_Checkout/layout/checkout_index_index.xml"]
        );
    }

    #[test]
    fn no_inventory_matches_means_no_findings() {
        assert!(run(&host(), LAYOUT).is_empty());
    }

    #[test]
    fn non_layout_xml_is_not_checked() {
        let host = host().with_xml_file("app/design/frontend/Acme/theme/Magento_Checkout/etc/di.xml");

        assert!(run(&host, "vendor/magento/module-checkout/etc/di.xml").is_empty());
    }
}
