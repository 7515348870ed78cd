use indexmap::IndexMap;
use serde::Serialize;

/// Findings keyed by category label, warnings and infos kept apart.
///
/// Categories appear in the order they were first reported and findings keep
/// their discovery order. Nothing is de-duplicated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckResults {
    warnings: IndexMap<String, Vec<String>>,
    infos: IndexMap<String, Vec<String>>,
}

impl CheckResults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, category: &str, finding: impl Into<String>) {
        push(&mut self.warnings, category, finding.into());
    }

    pub fn add_info(&mut self, category: &str, finding: impl Into<String>) {
        push(&mut self.infos, category, finding.into());
    }

    #[must_use]
    pub fn warnings(&self) -> &IndexMap<String, Vec<String>> {
        &self.warnings
    }

    #[must_use]
    pub fn infos(&self) -> &IndexMap<String, Vec<String>> {
        &self.infos
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.infos.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warning_count() == 0 && self.info_count() == 0
    }

    /// Appends every finding of `other`, category by category.
    pub fn extend(&mut self, other: &CheckResults) {
        for (category, findings) in &other.warnings {
            for finding in findings {
                self.add_warning(category, finding.clone());
            }
        }
        for (category, findings) in &other.infos {
            for finding in findings {
                self.add_info(category, finding.clone());
            }
        }
    }
}

fn push(map: &mut IndexMap<String, Vec<String>>, category: &str, finding: String) {
    match map.get_mut(category) {
        Some(findings) => findings.push(finding),
        None => {
            map.insert(category.to_string(), vec![finding]);
        }
    }
}
