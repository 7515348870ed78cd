pub mod checks;
mod error;
pub mod operations;
mod php;
mod providers;
pub mod resolver;
pub mod runner;
pub mod traits;

#[cfg(test)]
pub mod mocks;

pub use error::{CheckError, OperationError, Result};
pub use php::{affected_interceptable_functions, affected_tables};
pub use resolver::{AppPathResult, resolve_app_path};
pub use runner::{CheckRunner, EntryReport, RunReport};
