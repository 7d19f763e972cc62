use thiserror::Error;

pub type Result<T> = std::result::Result<T, SerpdataError>;

#[derive(Error, Debug)]
pub enum SerpdataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SerpData API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Vendor-level status code in an otherwise-200 response body.
    #[error("SerpData rejected request (code {code}): {message}")]
    Rejected { code: u32, message: String },
}
