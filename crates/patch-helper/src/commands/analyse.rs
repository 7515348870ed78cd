use patch_helper_host::load_snapshot;
use patch_helper_operations::operations::{AnalyseInput, AnalyseOperation};
use patch_helper_parse::ReaderOptions;
use tracing::info;

use super::{AnalyseArgs, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::{JsonFormatter, PlainTextFormatter, ReportFormatter};

pub(crate) fn run(args: AnalyseArgs) -> Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().map_err(CliError::CurrentDir)?,
    };
    let host = load_snapshot(&args.snapshot)?.with_root(&root);
    info!(snapshot = %args.snapshot.display(), root = %root.display(), "loaded host snapshot");

    let input = AnalyseInput {
        patch_path: args.patch,
        reader_options: ReaderOptions::default().with_original_prefix(args.original_prefix),
    };
    let output = AnalyseOperation::new(host).execute(&input)?;

    let rendered = match args.format {
        OutputFormat::Plain => PlainTextFormatter.format_report(&output)?,
        OutputFormat::Json => JsonFormatter.format_report(&output)?,
    };
    print!("{rendered}");

    let count = output.report.results.warning_count();
    if args.fail_on_warnings && count > 0 {
        return Err(CliError::WarningsFound { count });
    }
    Ok(())
}
