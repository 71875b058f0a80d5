use thiserror::Error;

/// Errors raised while validating a render request or persisting its buffer.
///
/// Composition itself is atomic: a generator either returns a complete
/// buffer or one of these before any pixel is produced.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed render parameters (channel mismatch, even blur kernel, ...)
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
