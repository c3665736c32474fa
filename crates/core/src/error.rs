/// Result alias that carries the custom [`SetlistError`] type.
pub type Result<T> = std::result::Result<T, SetlistError>;

/// Common error type for the core crate.
///
/// Only catalog and configuration loading can fail. Classification, planning,
/// scoring and assembly are total over any catalog.
#[derive(Debug, thiserror::Error)]
pub enum SetlistError {
    /// Free-form failure surfaced by the application layer.
    #[error("{0}")]
    Message(String),
    /// The input document has a shape no catalog can be built from.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON parse errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl SetlistError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}
