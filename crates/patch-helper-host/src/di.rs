use indexmap::IndexMap;
use serde::Deserialize;

fn normalize_class(class: &str) -> &str {
    class.trim_start_matches('\\')
}

/// A plugin declared against a class in one area.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginDeclaration {
    pub name: String,
    pub instance: String,
    #[serde(default)]
    pub disabled: bool,
    /// Interceptor methods the plugin class defines, e.g. `beforeSave`.
    #[serde(default)]
    pub methods: Vec<String>,
}

/// Dependency-injection configuration of one area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaConfig {
    #[serde(default)]
    preferences: IndexMap<String, String>,
    #[serde(default)]
    plugins: IndexMap<String, Vec<PluginDeclaration>>,
}

impl AreaConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_preference(mut self, class: &str, preference: &str) -> Self {
        self.preferences.insert(
            normalize_class(class).to_string(),
            normalize_class(preference).to_string(),
        );
        self
    }

    #[must_use]
    pub fn with_plugin(mut self, class: &str, plugin: PluginDeclaration) -> Self {
        self.plugins
            .entry(normalize_class(class).to_string())
            .or_default()
            .push(plugin);
        self
    }

    /// Strips leading namespace separators from every class name.
    pub(crate) fn normalized(self) -> Self {
        let preferences = self
            .preferences
            .into_iter()
            .map(|(class, preference)| {
                (
                    normalize_class(&class).to_string(),
                    normalize_class(&preference).to_string(),
                )
            })
            .collect();
        let mut plugins: IndexMap<String, Vec<PluginDeclaration>> = IndexMap::new();
        for (class, declarations) in self.plugins {
            plugins
                .entry(normalize_class(&class).to_string())
                .or_default()
                .extend(declarations.into_iter().map(|mut plugin| {
                    plugin.instance = normalize_class(&plugin.instance).to_string();
                    plugin
                }));
        }
        Self {
            preferences,
            plugins,
        }
    }

    #[must_use]
    pub fn preferences(&self) -> &IndexMap<String, String> {
        &self.preferences
    }

    #[must_use]
    pub fn preference_for(&self, class: &str) -> Option<&str> {
        self.preferences
            .get(normalize_class(class))
            .map(String::as_str)
    }

    #[must_use]
    pub fn plugins_for(&self, class: &str) -> &[PluginDeclaration] {
        self.plugins
            .get(normalize_class(class))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
