use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input does not contain any recognizable diff headers")]
    NoDiffHeaders,

    #[error("input exceeds maximum size of {max_bytes} bytes")]
    InputTooLarge { max_bytes: usize },
}
