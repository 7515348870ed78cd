use std::path::PathBuf;

use patch_helper_parse::{ReaderOptions, parse_patch_with};
use tracing::info;

use crate::runner::{CheckRunner, RunReport};
use crate::traits::HostMetadata;
use crate::{OperationError, Result};

pub struct AnalyseInput {
    pub patch_path: PathBuf,
    pub reader_options: ReaderOptions,
}

#[derive(Debug)]
pub struct AnalyseOutput {
    /// Number of file entries read from the patch.
    pub entry_count: usize,
    pub report: RunReport,
}

/// Reads a patch file and runs every check against the host.
pub struct AnalyseOperation<H> {
    host: H,
    runner: CheckRunner,
}

impl<H> AnalyseOperation<H>
where
    H: HostMetadata,
{
    pub fn new(host: H) -> Self {
        Self {
            host,
            runner: CheckRunner::with_default_checks(),
        }
    }

    #[must_use]
    pub fn with_runner(mut self, runner: CheckRunner) -> Self {
        self.runner = runner;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the patch file cannot be read or contains no
    /// recognizable diff sections.
    pub fn execute(&self, input: &AnalyseInput) -> Result<AnalyseOutput> {
        let content = std::fs::read_to_string(&input.patch_path).map_err(|source| {
            OperationError::PatchRead {
                path: input.patch_path.clone(),
                source,
            }
        })?;
        let parsed = parse_patch_with(&content, &input.reader_options)?;
        info!(
            entries = parsed.entries.len(),
            skipped = parsed.skipped.len(),
            "parsed patch file"
        );

        let report = self.runner.run(&self.host, &parsed);
        Ok(AnalyseOutput {
            entry_count: parsed.entries.len(),
            report,
        })
    }
}
