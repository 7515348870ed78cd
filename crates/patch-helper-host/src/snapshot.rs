use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use patch_helper_core::Area;
use serde::Deserialize;
use tracing::debug;

use crate::db_schema::{DbSchemaIndex, SchemaFile};
use crate::di::AreaConfig;
use crate::error::HostError;
use crate::fallback::{AssetRequest, ThemeFallbackResolver};
use crate::hyva;
use crate::path_map::PathMap;
use crate::theme::{Theme, ThemeDeclaration, ThemeId, ThemeTree};
use crate::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SnapshotFile {
    hyva: bool,
    minify_js: bool,
    modules: IndexMap<String, String>,
    libraries: IndexMap<String, String>,
    themes: Vec<ThemeDeclaration>,
    db_schema: Vec<SchemaFile>,
    areas: IndexMap<String, AreaConfig>,
    xml_files: Vec<String>,
    ignore_override_paths: Vec<String>,
}

/// Immutable metadata of the host application a patch is checked against.
#[derive(Debug, Clone)]
pub struct HostSnapshot {
    root: PathBuf,
    hyva: bool,
    modules: PathMap,
    libraries: PathMap,
    themes: ThemeTree,
    custom_frontend_themes: Vec<ThemeId>,
    custom_adminhtml_themes: Vec<ThemeId>,
    resolver: ThemeFallbackResolver,
    db_schema: DbSchemaIndex,
    areas: IndexMap<Area, AreaConfig>,
    xml_files: Vec<String>,
    ignored_override_paths: GlobSet,
    hyva_ignore_prefixes: Vec<String>,
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| HostError::GlobPattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| HostError::GlobPattern {
        pattern: patterns.join(", "),
        source,
    })
}

impl HostSnapshot {
    fn from_file(file: SnapshotFile) -> Result<Self> {
        let mut areas = IndexMap::new();
        for (name, config) in file.areas {
            let area = Area::from_name(&name).ok_or(HostError::UnknownArea { name })?;
            areas.insert(area, config.normalized());
        }

        let modules = PathMap::new(file.modules);
        let libraries = PathMap::new(file.libraries);
        let themes = ThemeTree::from_declarations(&file.themes);

        let ids = |list: Vec<&Theme>| list.iter().map(|theme| theme.id).collect::<Vec<_>>();
        let custom_adminhtml_themes = ids(themes.custom_themes(Area::Adminhtml));
        let (custom_frontend_themes, hyva_ignore_prefixes) = if file.hyva {
            let (hyva_themes, other_themes) =
                hyva::partition_themes(&themes, themes.custom_themes(Area::Frontend));
            let prefixes = hyva::ignore_prefixes(&themes, &other_themes, &modules);
            (ids(hyva_themes), prefixes)
        } else {
            (ids(themes.custom_themes(Area::Frontend)), Vec::new())
        };

        let mut xml_files = file.xml_files;
        xml_files.sort();
        xml_files.dedup();

        debug!(
            modules = modules.len(),
            libraries = libraries.len(),
            themes = themes.len(),
            hyva = file.hyva,
            "loaded host snapshot"
        );

        Ok(Self {
            root: PathBuf::from("."),
            hyva: file.hyva,
            modules,
            libraries,
            themes,
            custom_frontend_themes,
            custom_adminhtml_themes,
            resolver: ThemeFallbackResolver::new(file.minify_js),
            db_schema: DbSchemaIndex::from_files(&file.db_schema),
            areas,
            xml_files,
            ignored_override_paths: build_globset(&file.ignore_override_paths)?,
            hyva_ignore_prefixes,
        })
    }

    /// Directory that project-relative paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn is_hyva(&self) -> bool {
        self.hyva
    }

    #[must_use]
    pub fn modules(&self) -> &PathMap {
        &self.modules
    }

    #[must_use]
    pub fn libraries(&self) -> &PathMap {
        &self.libraries
    }

    #[must_use]
    pub fn themes(&self) -> &ThemeTree {
        &self.themes
    }

    /// Custom themes of an area. In Hyvä mode only Hyvä frontend themes count.
    #[must_use]
    pub fn custom_themes(&self, area: Area) -> Vec<&Theme> {
        let ids = match area {
            Area::Frontend => &self.custom_frontend_themes,
            Area::Adminhtml => &self.custom_adminhtml_themes,
            Area::Global | Area::Base => return Vec::new(),
        };
        ids.iter().filter_map(|&id| self.themes.get(id)).collect()
    }

    /// First existing file for `request` along the theme's fallback chain.
    #[must_use]
    pub fn resolve_asset(&self, theme: &Theme, request: &AssetRequest) -> Option<String> {
        let ancestry = self.themes.ancestry(theme.id);
        let module_dir = self.modules.prefix_of(&request.module);
        self.resolver
            .resolve(&self.root, &ancestry, module_dir, request)
    }

    #[must_use]
    pub fn is_ignored_override_path(&self, path: &str) -> bool {
        if self.hyva
            && self
                .hyva_ignore_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return true;
        }
        self.ignored_override_paths.is_match(path)
    }

    /// Module owning `path`; absolute paths under the root are accepted.
    #[must_use]
    pub fn module_from_path(&self, path: &str) -> Option<&str> {
        let relative = Path::new(path)
            .strip_prefix(&self.root)
            .ok()
            .and_then(Path::to_str)
            .unwrap_or(path);
        self.modules.find(relative).map(|found| found.name)
    }

    #[must_use]
    pub fn db_schema(&self) -> &DbSchemaIndex {
        &self.db_schema
    }

    #[must_use]
    pub fn area_config(&self, area: Area) -> Option<&AreaConfig> {
        self.areas.get(&area)
    }

    /// All known XML files, sorted.
    #[must_use]
    pub fn xml_files(&self) -> &[String] {
        &self.xml_files
    }
}

/// Parses a host snapshot from TOML text.
///
/// # Errors
///
/// Returns an error if the text is not a valid snapshot, names an unknown
/// area, or carries an invalid ignore pattern.
pub fn parse_snapshot(content: &str) -> Result<HostSnapshot> {
    let file: SnapshotFile = toml::from_str(content)?;
    HostSnapshot::from_file(file)
}

/// Reads and parses a host snapshot file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_snapshot(path: &Path) -> Result<HostSnapshot> {
    let content = std::fs::read_to_string(path).map_err(|source| HostError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&content)
}
