use patch_helper_operations::operations::AnalyseOutput;

use super::ReportFormatter;
use crate::error::Result;

pub(crate) struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, output: &AnalyseOutput) -> Result<String> {
        let mut rendered = serde_json::to_string_pretty(&output.report)?;
        rendered.push('\n');
        Ok(rendered)
    }
}
