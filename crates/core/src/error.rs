/// Result alias that carries the custom [`ChladniError`] type.
pub type Result<T> = std::result::Result<T, ChladniError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ChladniError {
    /// An input fell outside the domain an operation is defined on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration files that fail to parse.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ChladniError {
    /// Creates a [`ChladniError::InvalidArgument`] from the provided message.
    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
