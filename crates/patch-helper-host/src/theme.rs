use std::collections::HashSet;

use patch_helper_core::Area;
use serde::Deserialize;
use tracing::debug;

const MAGENTO_THEME_PREFIX: &str = "Magento/";

/// Theme as declared in a host snapshot; parents are referenced by code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeDeclaration {
    pub code: String,
    pub area: Area,
    pub path: String,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThemeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub id: ThemeId,
    pub code: String,
    pub area: Area,
    /// Project-relative theme directory, without trailing slash.
    pub path: String,
    pub parent: Option<ThemeId>,
}

impl Theme {
    #[must_use]
    pub fn is_magento(&self) -> bool {
        self.code.starts_with(MAGENTO_THEME_PREFIX)
    }
}

/// Arena of themes linked to their parents by index.
#[derive(Debug, Clone, Default)]
pub struct ThemeTree {
    themes: Vec<Theme>,
}

impl ThemeTree {
    #[must_use]
    pub fn from_declarations(declarations: &[ThemeDeclaration]) -> Self {
        let mut themes: Vec<Theme> = declarations
            .iter()
            .enumerate()
            .map(|(index, declaration)| Theme {
                id: ThemeId(index),
                code: declaration.code.clone(),
                area: declaration.area,
                path: declaration.path.trim_end_matches('/').to_string(),
                parent: None,
            })
            .collect();

        for (index, declaration) in declarations.iter().enumerate() {
            let Some(parent_code) = declaration.parent.as_deref() else {
                continue;
            };
            let parent = themes
                .iter()
                .find(|t| t.area == declaration.area && t.code == parent_code)
                .map(|t| t.id);
            if parent.is_none() {
                debug!(
                    theme = %declaration.code,
                    parent = parent_code,
                    "parent theme not declared in snapshot"
                );
            }
            themes[index].parent = parent;
        }

        Self { themes }
    }

    #[must_use]
    pub fn get(&self, id: ThemeId) -> Option<&Theme> {
        self.themes.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// The theme followed by its ancestors, nearest first.
    ///
    /// Stops at the first repeated theme, so a cyclic declaration cannot loop.
    #[must_use]
    pub fn ancestry(&self, id: ThemeId) -> Vec<&Theme> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(id);
        while let Some(current) = next {
            if !visited.insert(current) {
                break;
            }
            let Some(theme) = self.get(current) else {
                break;
            };
            chain.push(theme);
            next = theme.parent;
        }
        chain
    }

    /// Whether the theme or any of its ancestors has a code starting with `prefix`.
    #[must_use]
    pub fn is_or_descends_from(&self, id: ThemeId, prefix: &str) -> bool {
        self.ancestry(id)
            .iter()
            .any(|theme| theme.code.starts_with(prefix))
    }

    /// Non-Magento themes of the given area, in declaration order.
    #[must_use]
    pub fn custom_themes(&self, area: Area) -> Vec<&Theme> {
        self.themes
            .iter()
            .filter(|theme| theme.area == area && !theme.is_magento())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declare(code: &str, area: Area, parent: Option<&str>) -> ThemeDeclaration {
        ThemeDeclaration {
            code: code.to_string(),
            area,
            path: format!("app/design/{area}/{code}/"),
            parent: parent.map(String::from),
        }
    }

    fn sample_tree() -> ThemeTree {
        ThemeTree::from_declarations(&[
            declare("Magento/blank", Area::Frontend, None),
            declare("Magento/luma", Area::Frontend, Some("Magento/blank")),
            declare("Ampersand/theme", Area::Frontend, Some("Magento/luma")),
            declare("Ampersand/admin", Area::Adminhtml, None),
        ])
    }

    #[test]
    fn ancestry_walks_to_root() {
        let tree = sample_tree();
        let child = tree.custom_themes(Area::Frontend)[0].id;

        let codes: Vec<_> = tree.ancestry(child).iter().map(|t| t.code.as_str()).collect();

        assert_eq!(codes, vec!["Ampersand/theme", "Magento/luma", "Magento/blank"]);
    }

    #[test]
    fn paths_lose_trailing_slash() {
        let tree = sample_tree();

        assert_eq!(
            tree.custom_themes(Area::Frontend)[0].path,
            "app/design/frontend/Ampersand/theme"
        );
    }

    #[test]
    fn custom_themes_exclude_magento_and_other_areas() {
        let tree = sample_tree();

        let frontend: Vec<_> = tree
            .custom_themes(Area::Frontend)
            .iter()
            .map(|t| t.code.as_str())
            .collect();
        let admin: Vec<_> = tree
            .custom_themes(Area::Adminhtml)
            .iter()
            .map(|t| t.code.as_str())
            .collect();

        assert_eq!(frontend, vec!["Ampersand/theme"]);
        assert_eq!(admin, vec!["Ampersand/admin"]);
    }

    #[test]
    fn cyclic_parents_terminate() {
        let tree = ThemeTree::from_declarations(&[
            declare("A/one", Area::Frontend, Some("A/two")),
            declare("A/two", Area::Frontend, Some("A/one")),
        ]);
        let first = tree.iter().next().expect("theme").id;

        assert_eq!(tree.ancestry(first).len(), 2);
        assert!(!tree.is_or_descends_from(first, "Hyva/"));
    }

    #[test]
    fn detects_descent_from_code_prefix() {
        let tree = ThemeTree::from_declarations(&[
            declare("Hyva/default", Area::Frontend, None),
            declare("Acme/hyva-child", Area::Frontend, Some("Hyva/default")),
            declare("Acme/luma-child", Area::Frontend, Some("Magento/luma")),
        ]);
        let ids: Vec<_> = tree.iter().map(|t| t.id).collect();

        assert!(tree.is_or_descends_from(ids[0], "Hyva/"));
        assert!(tree.is_or_descends_from(ids[1], "Hyva/"));
        assert!(!tree.is_or_descends_from(ids[2], "Hyva/"));
        assert_eq!(tree.get(ids[2]).and_then(|t| t.parent), None);
    }

    #[test]
    fn parent_lookup_is_area_scoped() {
        let tree = ThemeTree::from_declarations(&[
            declare("Acme/base", Area::Adminhtml, None),
            declare("Acme/child", Area::Frontend, Some("Acme/base")),
        ]);

        assert!(tree.iter().all(|t| t.parent.is_none()));
    }
}
