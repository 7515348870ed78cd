use patch_helper_operations::operations::AnalyseOutput;

use crate::error::Result;

pub(crate) trait ReportFormatter {
    fn format_report(&self, output: &AnalyseOutput) -> Result<String>;
}
