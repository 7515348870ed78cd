use indexmap::IndexMap;
use patch_helper_operations::operations::AnalyseOutput;
use patch_helper_operations::runner::SKIPPED_SECTION_CATEGORY;

use super::ReportFormatter;
use crate::error::Result;

const NO_FILE: &str = "-";

pub(crate) struct PlainTextFormatter;

impl PlainTextFormatter {
    fn format_rows(
        output: &mut String,
        level: &str,
        vendor_file: &str,
        findings: &IndexMap<String, Vec<String>>,
    ) {
        for (category, paths) in findings {
            for path in paths {
                output.push_str(&format!("{level} | {category} | {vendor_file} | {path}\n"));
            }
        }
    }

    fn format_summary(output: &mut String, result: &AnalyseOutput) {
        let results = &result.report.results;
        output.push_str(&format!(
            "\n{} patch entries checked, {} warning(s), {} info(s)\n",
            result.entry_count,
            results.warning_count(),
            results.info_count()
        ));
    }
}

impl ReportFormatter for PlainTextFormatter {
    fn format_report(&self, result: &AnalyseOutput) -> Result<String> {
        let mut output = String::new();

        for entry in &result.report.entries {
            Self::format_rows(&mut output, "WARN", &entry.path, entry.results.warnings());
        }
        for entry in &result.report.entries {
            Self::format_rows(&mut output, "INFO", &entry.path, entry.results.infos());
        }
        if let Some(skipped) = result.report.results.infos().get(SKIPPED_SECTION_CATEGORY) {
            for reason in skipped {
                output.push_str(&format!("INFO | {SKIPPED_SECTION_CATEGORY} | {NO_FILE} | {reason}\n"));
            }
        }

        Self::format_summary(&mut output, result);
        Ok(output)
    }
}
