use thiserror::Error;

/// Classified failures of the response pipeline
///
/// These are the only failure signals that leave the pipeline. Detail about
/// unexpected errors stays in the logs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Secure transport required")]
    Forbidden,

    #[error("Client is not authorized for this operation")]
    Unauthorized,

    #[error("The request was invalid")]
    BadRequest,

    #[error("An error occurred while processing your request")]
    Internal,

    #[error("The data source returned an unsupported status")]
    NotImplemented,
}
