mod area;
mod entry;
mod results;

pub use area::Area;
pub use entry::{FileStatus, Hunk, HunkRange, PatchEntry};
pub use results::CheckResults;
