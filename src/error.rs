use thiserror::Error;

#[derive(Debug, Error)]
pub enum PassportError {
    #[error("Missing credential: set GEMINI_API_KEY (or API_KEY) in the environment")]
    MissingCredential,
    #[error("Empty batch: at least one image is required")]
    EmptyBatch,
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationFailure),
    #[error("Batch error: {0}")]
    Batch(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single (image, prompt) call did not produce a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationCause {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A failed pair, tagged with the upload and prompt it belonged to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generation failed for {file_name} with prompt \"{prompt}\": {cause}")]
pub struct GenerationFailure {
    pub file_name: String,
    pub prompt: String,
    pub cause: GenerationCause,
}

impl GenerationFailure {
    pub fn new(
        file_name: impl Into<String>,
        prompt: impl Into<String>,
        cause: GenerationCause,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            prompt: prompt.into(),
            cause,
        }
    }
}

pub type Result<T> = std::result::Result<T, PassportError>;
