use std::path::Path;

use indexmap::IndexMap;
use patch_helper_core::Area;
use patch_helper_host::{AreaConfig, AssetRequest, PathMap, Theme};

/// Read-only view of the host application consumed by the resolver and checks.
pub trait HostMetadata {
    /// Directory that project-relative paths are resolved against.
    fn root(&self) -> &Path;

    fn paths_to_modules(&self) -> &PathMap;

    fn paths_to_libraries(&self) -> &PathMap;

    fn custom_themes(&self, area: Area) -> Vec<&Theme>;

    /// The theme followed by its ancestors, nearest first.
    fn theme_ancestry(&self, theme: &Theme) -> Vec<&Theme>;

    /// Project-relative path the theme would serve `request` from, if any.
    fn resolve_minified_candidate(&self, theme: &Theme, request: &AssetRequest) -> Option<String>;

    fn is_ignored_override_path(&self, path: &str) -> bool;

    fn module_from_path(&self, path: &str) -> Option<&str>;

    /// Non-Magento schema files altering each table.
    fn db_schema_third_party_alterations(&self) -> &IndexMap<String, Vec<String>>;

    fn db_schema_primary_definition(&self, table: &str) -> Option<&str>;

    fn area_config(&self, area: Area) -> Option<&AreaConfig>;

    /// Project-relative XML files, sorted ascending.
    fn xml_files(&self) -> &[String];
}
