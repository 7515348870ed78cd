use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to analyse patch")]
    Operation(#[from] patch_helper_operations::OperationError),

    #[error("failed to load host snapshot")]
    Host(#[from] patch_helper_host::HostError),

    #[error("failed to render report")]
    Render(#[from] serde_json::Error),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("{count} warning(s) found")]
    WarningsFound { count: usize },
}

pub type Result<T> = std::result::Result<T, CliError>;
