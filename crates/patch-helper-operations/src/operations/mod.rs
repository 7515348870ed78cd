mod analyse;

pub use analyse::{AnalyseInput, AnalyseOperation, AnalyseOutput};
