use thiserror::Error;

pub type Result<T> = std::result::Result<T, StockPhotoError>;

#[derive(Error, Debug)]
pub enum StockPhotoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stock photo API error ({status}): {message}")]
    Api { status: u16, message: String },
}
