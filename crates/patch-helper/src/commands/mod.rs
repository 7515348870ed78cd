mod analyse;

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::error::Result;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Args)]
pub(crate) struct AnalyseArgs {
    /// Patch produced by diffing the old and new vendor trees
    #[arg(long, default_value = "vendor.patch")]
    pub patch: PathBuf,

    /// Host snapshot (TOML) describing modules, themes and configuration
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Project root that override paths are probed under (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Directory prefix of the pre-upgrade vendor tree in the patch
    #[arg(long, default_value = "vendor_orig/")]
    pub original_prefix: String,

    /// Exit with failure when any warning is reported
    #[arg(long)]
    pub fail_on_warnings: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check which overrides a vendor patch affects
    Analyse(AnalyseArgs),
}

impl Commands {
    pub(crate) fn execute(self) -> Result<()> {
        match self {
            Self::Analyse(args) => analyse::run(args),
        }
    }
}
