use thiserror::Error;

#[derive(Error, Debug)]
pub enum DraftlineError {
    #[error("Keyword data error: {0}")]
    KeywordData(String),

    #[error("Generation error: {0}")]
    Generation(String),

    /// The only fatal core error: every attempt in the retry budget failed.
    /// Carries the last attempt's error so callers can report the real cause.
    #[error("Generation exhausted after {attempts} attempts: {last_error}")]
    GenerationExhausted { attempts: u32, last_error: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Image resolution error: {0}")]
    ImageResolution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
