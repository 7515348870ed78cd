use indexmap::IndexSet;

use crate::fallback::AssetKind;
use crate::path_map::PathMap;
use crate::theme::{Theme, ThemeTree};

pub(crate) const HYVA_THEME_PREFIX: &str = "Hyva/";

const MAGENTO_MODULE_PATH: &str = "vendor/magento";

const KINDS: [AssetKind; 3] = [AssetKind::Static, AssetKind::Template, AssetKind::Email];

/// Splits custom frontend themes into Hyvä-descended and other themes.
pub(crate) fn partition_themes<'t>(
    tree: &'t ThemeTree,
    themes: Vec<&'t Theme>,
) -> (Vec<&'t Theme>, Vec<&'t Theme>) {
    themes
        .into_iter()
        .partition(|theme| tree.is_or_descends_from(theme.id, HYVA_THEME_PREFIX))
}

/// Directory prefixes only reachable from non-Hyvä themes.
///
/// Covers theme-level `web/` and `i18n/`, theme module directories for every
/// Magento module, and those modules' own frontend and base view directories.
pub(crate) fn ignore_prefixes(
    tree: &ThemeTree,
    non_hyva_themes: &[&Theme],
    modules: &PathMap,
) -> Vec<String> {
    let magento_modules: Vec<_> = modules
        .iter()
        .filter(|module| module.prefix.starts_with(MAGENTO_MODULE_PATH))
        .collect();

    let mut dirs = IndexSet::new();
    for theme in non_hyva_themes {
        for ancestor in tree.ancestry(theme.id) {
            dirs.insert(format!("{}/web/", ancestor.path));
            dirs.insert(format!("{}/i18n/", ancestor.path));
            for module in &magento_modules {
                for kind in KINDS {
                    dirs.insert(format!(
                        "{}/{}/{}/",
                        ancestor.path,
                        module.name,
                        kind.directory()
                    ));
                }
            }
        }
    }
    if !non_hyva_themes.is_empty() {
        for module in &magento_modules {
            for area in ["frontend", "base"] {
                for kind in KINDS {
                    dirs.insert(format!("{}view/{area}/{}/", module.prefix, kind.directory()));
                }
            }
            dirs.insert(format!("{}i18n/", module.prefix));
        }
    }
    dirs.into_iter().collect()
}
