//! Errors raised while reading selections and form input.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ListingError>;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),

    #[error("Failed to decode image {name}: {source}")]
    ImageDecode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid data URL: {0}")]
    DataUrl(String),

    #[error("Invalid form input: {0}")]
    Form(String),

    #[error("A document is already being generated")]
    AlreadyGenerating,
}
