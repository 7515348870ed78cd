use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use patch_helper_core::Area;
use patch_helper_host::{AreaConfig, AssetRequest, PathMap, Theme, ThemeDeclaration, ThemeTree};

use crate::traits::HostMetadata;

pub struct MockHost {
    root: PathBuf,
    module_entries: Vec<(String, String)>,
    library_entries: Vec<(String, String)>,
    modules: PathMap,
    libraries: PathMap,
    declarations: Vec<ThemeDeclaration>,
    themes: ThemeTree,
    candidates: HashMap<String, String>,
    ignored_prefixes: Vec<String>,
    primary_definitions: IndexMap<String, String>,
    alterations: IndexMap<String, Vec<String>>,
    areas: IndexMap<Area, AreaConfig>,
    xml_files: Vec<String>,
}

impl MockHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/mock/shop"),
            module_entries: Vec::new(),
            library_entries: Vec::new(),
            modules: PathMap::default(),
            libraries: PathMap::default(),
            declarations: Vec::new(),
            themes: ThemeTree::default(),
            candidates: HashMap::new(),
            ignored_prefixes: Vec::new(),
            primary_definitions: IndexMap::new(),
            alterations: IndexMap::new(),
            areas: IndexMap::new(),
            xml_files: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    #[must_use]
    pub fn with_module(mut self, prefix: &str, name: &str) -> Self {
        self.module_entries
            .push((prefix.to_string(), name.to_string()));
        self.modules = PathMap::new(self.module_entries.clone());
        self
    }

    #[must_use]
    pub fn with_library(mut self, prefix: &str, name: &str) -> Self {
        self.library_entries
            .push((prefix.to_string(), name.to_string()));
        self.libraries = PathMap::new(self.library_entries.clone());
        self
    }

    #[must_use]
    pub fn with_theme(mut self, code: &str, area: Area, path: &str, parent: Option<&str>) -> Self {
        self.declarations.push(ThemeDeclaration {
            code: code.to_string(),
            area,
            path: path.to_string(),
            parent: parent.map(String::from),
        });
        self.themes = ThemeTree::from_declarations(&self.declarations);
        self
    }

    /// Path the resolver answers for any request against the theme `code`.
    #[must_use]
    pub fn with_candidate(mut self, code: &str, path: &str) -> Self {
        self.candidates.insert(code.to_string(), path.to_string());
        self
    }

    #[must_use]
    pub fn with_ignored_prefix(mut self, prefix: &str) -> Self {
        self.ignored_prefixes.push(prefix.to_string());
        self
    }

    #[must_use]
    pub fn with_primary_definition(mut self, table: &str, file: &str) -> Self {
        self.primary_definitions
            .insert(table.to_string(), file.to_string());
        self
    }

    #[must_use]
    pub fn with_alteration(mut self, table: &str, file: &str) -> Self {
        self.alterations
            .entry(table.to_string())
            .or_default()
            .push(file.to_string());
        self
    }

    #[must_use]
    pub fn with_area_config(mut self, area: Area, config: AreaConfig) -> Self {
        self.areas.insert(area, config);
        self
    }

    #[must_use]
    pub fn with_xml_file(mut self, path: &str) -> Self {
        self.xml_files.push(path.to_string());
        self.xml_files.sort();
        self
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostMetadata for MockHost {
    fn root(&self) -> &Path {
        &self.root
    }

    fn paths_to_modules(&self) -> &PathMap {
        &self.modules
    }

    fn paths_to_libraries(&self) -> &PathMap {
        &self.libraries
    }

    fn custom_themes(&self, area: Area) -> Vec<&Theme> {
        self.themes.custom_themes(area)
    }

    fn theme_ancestry(&self, theme: &Theme) -> Vec<&Theme> {
        self.themes.ancestry(theme.id)
    }

    fn resolve_minified_candidate(&self, theme: &Theme, _request: &AssetRequest) -> Option<String> {
        self.candidates.get(&theme.code).cloned()
    }

    fn is_ignored_override_path(&self, path: &str) -> bool {
        self.ignored_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn module_from_path(&self, path: &str) -> Option<&str> {
        self.modules.find(path).map(|found| found.name)
    }

    fn db_schema_third_party_alterations(&self) -> &IndexMap<String, Vec<String>> {
        &self.alterations
    }

    fn db_schema_primary_definition(&self, table: &str) -> Option<&str> {
        self.primary_definitions.get(table).map(String::as_str)
    }

    fn area_config(&self, area: Area) -> Option<&AreaConfig> {
        self.areas.get(&area)
    }

    fn xml_files(&self) -> &[String] {
        &self.xml_files
    }
}
