pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use config::{Config, Tuning};
pub use error::DraftlineError;
pub use types::*;
