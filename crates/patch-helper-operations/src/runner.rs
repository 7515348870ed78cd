use patch_helper_core::CheckResults;
use patch_helper_parse::ParsedPatch;
use serde::Serialize;
use tracing::{debug, warn};

use crate::checks::{
    Check, CheckContext, ClassPluginCheck, ClassPreferenceCheck, DbSchemaCheck,
    FrontendAssetCheck, LayoutOverrideCheck,
};
use crate::resolver::resolve_app_path;
use crate::traits::HostMetadata;

pub const SKIPPED_SECTION_CATEGORY: &str = "Skipped patch section";
pub const CHECK_FAILURE_CATEGORY: &str = "Check failure";

/// Findings for one changed vendor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub path: String,
    pub results: CheckResults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Every finding of the run, aggregated by category.
    pub results: CheckResults,
    /// Entries with at least one finding, in patch order.
    pub entries: Vec<EntryReport>,
}

impl RunReport {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.results.warning_count() > 0
    }
}

/// Runs registered checks over every entry of a parsed patch, in
/// registration order.
pub struct CheckRunner {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
    #[must_use]
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    #[must_use]
    pub fn with_default_checks() -> Self {
        let mut runner = Self::new();
        runner.add_check(Box::new(FrontendAssetCheck));
        runner.add_check(Box::new(ClassPreferenceCheck));
        runner.add_check(Box::new(ClassPluginCheck));
        runner.add_check(Box::new(LayoutOverrideCheck));
        runner.add_check(Box::new(DbSchemaCheck));
        runner
    }

    pub fn add_check(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    /// Names of registered checks, in run order.
    pub fn check_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|check| check.name())
    }

    /// Checks every entry. A failing check becomes an info note and the run
    /// carries on; this never fails as a whole.
    #[must_use]
    pub fn run(&self, host: &dyn HostMetadata, patch: &ParsedPatch) -> RunReport {
        let mut report = RunReport::default();

        for skipped in &patch.skipped {
            report.results.add_info(
                SKIPPED_SECTION_CATEGORY,
                format!("line {}: {}", skipped.line, skipped.reason),
            );
        }

        for entry in &patch.entries {
            let resolved = resolve_app_path(entry.path(), host);
            let context = CheckContext {
                host,
                entry,
                resolved: &resolved,
            };

            let mut entry_results = CheckResults::new();
            for check in &self.checks {
                if !check.can_check(&context) {
                    continue;
                }
                debug!(check = check.name(), path = entry.path(), "running check");

                let mut scratch = CheckResults::new();
                match check.check(&context, &mut scratch) {
                    Ok(()) => entry_results.extend(&scratch),
                    Err(error) => {
                        warn!(
                            check = check.name(),
                            path = entry.path(),
                            error = %error,
                            "check failed"
                        );
                        entry_results.add_info(
                            CHECK_FAILURE_CATEGORY,
                            format!("{}: {} failed: {error}", entry.path(), check.name()),
                        );
                    }
                }
            }

            if !entry_results.is_empty() {
                report.results.extend(&entry_results);
                report.entries.push(EntryReport {
                    path: entry.path().to_string(),
                    results: entry_results,
                });
            }
        }

        report
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::with_default_checks()
    }
}
