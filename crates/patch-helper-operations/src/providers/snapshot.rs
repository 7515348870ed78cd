use std::path::Path;

use indexmap::IndexMap;
use patch_helper_core::Area;
use patch_helper_host::{AreaConfig, AssetRequest, HostSnapshot, PathMap, Theme};

use crate::traits::HostMetadata;

impl HostMetadata for HostSnapshot {
    fn root(&self) -> &Path {
        HostSnapshot::root(self)
    }

    fn paths_to_modules(&self) -> &PathMap {
        self.modules()
    }

    fn paths_to_libraries(&self) -> &PathMap {
        self.libraries()
    }

    fn custom_themes(&self, area: Area) -> Vec<&Theme> {
        HostSnapshot::custom_themes(self, area)
    }

    fn theme_ancestry(&self, theme: &Theme) -> Vec<&Theme> {
        self.themes().ancestry(theme.id)
    }

    fn resolve_minified_candidate(&self, theme: &Theme, request: &AssetRequest) -> Option<String> {
        self.resolve_asset(theme, request)
    }

    fn is_ignored_override_path(&self, path: &str) -> bool {
        HostSnapshot::is_ignored_override_path(self, path)
    }

    fn module_from_path(&self, path: &str) -> Option<&str> {
        HostSnapshot::module_from_path(self, path)
    }

    fn db_schema_third_party_alterations(&self) -> &IndexMap<String, Vec<String>> {
        self.db_schema().third_party_alterations()
    }

    fn db_schema_primary_definition(&self, table: &str) -> Option<&str> {
        self.db_schema().primary_definition(table)
    }

    fn area_config(&self, area: Area) -> Option<&AreaConfig> {
        HostSnapshot::area_config(self, area)
    }

    fn xml_files(&self) -> &[String] {
        HostSnapshot::xml_files(self)
    }
}
