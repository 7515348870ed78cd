mod error;
mod parse;

pub use error::ParseError;
pub use parse::{ParsedPatch, ReaderOptions, SkippedSection, parse_patch, parse_patch_with};
