use thiserror::Error;

/// Route discovery errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("Handler not registered: {0}")]
    UnknownHandler(String),

    #[error("Handler registered twice: {0}")]
    DuplicateHandler(String),
}
