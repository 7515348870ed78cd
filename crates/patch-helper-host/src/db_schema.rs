use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::MAGENTO_VENDOR_PREFIX;

const SCHEMA_SUFFIX: &str = "/etc/db_schema.xml";
const IGNORED_SUFFIXES: [&str; 2] = [
    "/magento2-base/app/etc/db_schema.xml",
    "/magento2-ee-base/app/etc/db_schema.xml",
];
const IGNORED_DIRECTORIES: [&str; 2] = ["/tests/", "/dev/tools/"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableDeclaration {
    pub name: String,
    /// Whether the declaration carries a primary key constraint.
    #[serde(default)]
    pub primary: bool,
}

/// Table declarations found in one `db_schema.xml` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaFile {
    pub file: String,
    #[serde(default)]
    pub tables: Vec<TableDeclaration>,
}

/// Which files define and which files alter each table.
#[derive(Debug, Clone, Default)]
pub struct DbSchemaIndex {
    primary_definitions: IndexMap<String, String>,
    third_party_alterations: IndexMap<String, Vec<String>>,
    ambiguous_tables: Vec<String>,
}

fn is_indexed_schema(file: &str) -> bool {
    let file = if file.starts_with('/') {
        file.to_string()
    } else {
        format!("/{file}")
    };
    file.ends_with(SCHEMA_SUFFIX)
        && !IGNORED_SUFFIXES.iter().any(|suffix| file.ends_with(suffix))
        && !IGNORED_DIRECTORIES.iter().any(|dir| file.contains(dir))
}

impl DbSchemaIndex {
    #[must_use]
    pub fn from_files(files: &[SchemaFile]) -> Self {
        let mut seen = HashSet::new();
        let files: Vec<&SchemaFile> = files
            .iter()
            .filter(|schema| is_indexed_schema(&schema.file))
            .filter(|schema| seen.insert(schema.file.as_str()))
            .collect();

        let mut declarations: IndexMap<&str, Vec<(&str, bool)>> = IndexMap::new();
        for schema in &files {
            for table in &schema.tables {
                declarations
                    .entry(table.name.as_str())
                    .or_default()
                    .push((schema.file.as_str(), table.primary));
            }
        }
        declarations.sort_keys();

        let mut index = Self::default();
        for (table, declared_in) in declarations {
            let primaries: Vec<&str> = declared_in
                .iter()
                .filter(|(_, primary)| *primary)
                .map(|(file, _)| *file)
                .collect();
            let mut magento_alterations = declared_in
                .iter()
                .filter(|(file, primary)| !primary && file.starts_with(MAGENTO_VENDOR_PREFIX))
                .map(|(file, _)| *file);
            let third_party: Vec<String> = declared_in
                .iter()
                .filter(|(file, primary)| !primary && !file.starts_with(MAGENTO_VENDOR_PREFIX))
                .map(|(file, _)| (*file).to_string())
                .collect();

            if !third_party.is_empty() {
                index
                    .third_party_alterations
                    .insert(table.to_string(), third_party);
            }

            match primaries.as_slice() {
                [] => {
                    if let Some(file) = magento_alterations.next() {
                        index
                            .primary_definitions
                            .insert(table.to_string(), file.to_string());
                    }
                }
                [file] => {
                    index
                        .primary_definitions
                        .insert(table.to_string(), (*file).to_string());
                }
                _ => {
                    debug!(table = %table, count = primaries.len(), "table has several primary definitions");
                    index.ambiguous_tables.push(table.to_string());
                }
            }
        }
        index
    }

    /// File holding the primary definition of each table, keyed by table name.
    #[must_use]
    pub fn primary_definitions(&self) -> &IndexMap<String, String> {
        &self.primary_definitions
    }

    #[must_use]
    pub fn primary_definition(&self, table: &str) -> Option<&str> {
        self.primary_definitions.get(table).map(String::as_str)
    }

    /// Non-Magento files that alter each table without defining it.
    #[must_use]
    pub fn third_party_alterations(&self) -> &IndexMap<String, Vec<String>> {
        &self.third_party_alterations
    }

    /// Tables with more than one primary definition. These get no primary
    /// definition entry.
    #[must_use]
    pub fn ambiguous_tables(&self) -> &[String] {
        &self.ambiguous_tables
    }
}
