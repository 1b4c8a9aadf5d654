use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    /// Command name has no word character left after stripping the prefix.
    #[error("Invalid command: {0:?}")]
    InvalidCommand(String),

    /// A text/inline route pattern (or a compiled command rule) failed to compile.
    #[error("Invalid route pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Webhook body was larger than the accepted cap.
    #[error("Request body too large: {0} bytes")]
    BodyTooLarge(usize),

    /// Webhook body was not a decodable update object.
    #[error("Malformed update payload: {0}")]
    MalformedUpdate(#[from] serde_json::Error),

    /// Application handler or middleware failure.
    #[error("Handler error: {0}")]
    Handler(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RouterError>;
