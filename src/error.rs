use std::path::PathBuf;

use thiserror::Error;

/// Failure to read or decode one of the dataset files.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("read dataset file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode dataset file: {file}")]
    Decode {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum QuoteError {
    /// The dataset could not be opened or decoded. Fatal to the request.
    #[error("quote dataset unavailable")]
    DataUnavailable(#[from] DatasetError),

    /// No record carries the requested date.
    #[error("no quote found for date {date:?}")]
    NotFound { date: String },

    /// A feed entry cannot be represented in the target wire format.
    #[error("serialize feed: {0}")]
    Serialization(String),
}

pub type Result<T, E = QuoteError> = std::result::Result<T, E>;
