use indexmap::IndexSet;
use patch_helper_core::CheckResults;
use tracing::debug;

use super::{Check, CheckContext};
use crate::error::CheckError;
use crate::php::affected_tables;

pub const DB_SCHEMA_CATEGORY: &str = "DB schema alteration";

const SCHEMA_FILE_SUFFIX: &str = "/etc/db_schema.xml";

/// Third-party schema files altering a table whose primary definition changed.
///
/// Tables without a single known primary definition (none declared, or
/// several) are not reported.
#[derive(Debug, Default)]
pub struct DbSchemaCheck;

impl Check for DbSchemaCheck {
    fn name(&self) -> &'static str {
        "db-schema"
    }

    fn can_check(&self, context: &CheckContext<'_>) -> bool {
        context.resolved.module().is_some() && context.vendor_path().ends_with(SCHEMA_FILE_SUFFIX)
    }

    fn check(&self, context: &CheckContext<'_>, results: &mut CheckResults) -> Result<(), CheckError> {
        let vendor_path = context.vendor_path();
        let alterations = context.host.db_schema_third_party_alterations();

        let mut findings = IndexSet::new();
        for table in affected_tables(context.entry) {
            match context.host.db_schema_primary_definition(&table) {
                Some(file) if file == vendor_path => {}
                Some(_) => {
                    debug!(table = %table, path = vendor_path, "change is not to the primary definition");
                    continue;
                }
                None => {
                    debug!(table = %table, "table has no single primary definition");
                    continue;
                }
            }
            for file in alterations.get(&table).into_iter().flatten() {
                findings.insert(file.clone());
            }
        }

        for file in findings {
            results.add_warning(DB_SCHEMA_CATEGORY, file);
        }
        Ok(())
    }
}
