use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::DatasetError;
use crate::formats::{ContributorDirectory, Quote};

pub const QUOTES_FILE: &str = "quotes.json";
pub const CONTRIBUTORS_FILE: &str = "contributors.json";

static EMBEDDED_QUOTES: &[u8] = include_bytes!("../data/quotes.json");
static EMBEDDED_CONTRIBUTORS: &[u8] = include_bytes!("../data/contributors.json");

/// Where the read-only datasets come from. Every call reads the file afresh;
/// implementations must not cache.
pub trait DatasetSource: std::fmt::Debug + Send + Sync {
    fn read(&self, file: &'static str) -> Result<Cow<'static, [u8]>, DatasetError>;
}

/// Datasets compiled into the binary from `data/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedDataset;

impl DatasetSource for EmbeddedDataset {
    fn read(&self, file: &'static str) -> Result<Cow<'static, [u8]>, DatasetError> {
        match file {
            QUOTES_FILE => Ok(Cow::Borrowed(EMBEDDED_QUOTES)),
            CONTRIBUTORS_FILE => Ok(Cow::Borrowed(EMBEDDED_CONTRIBUTORS)),
            _ => Err(DatasetError::Read {
                path: PathBuf::from(file),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

/// Datasets read from a directory holding `quotes.json` and `contributors.json`.
#[derive(Debug, Clone)]
pub struct DirectoryDataset {
    dir: PathBuf,
}

impl DirectoryDataset {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DatasetSource for DirectoryDataset {
    fn read(&self, file: &'static str) -> Result<Cow<'static, [u8]>, DatasetError> {
        let path = self.dir.join(file);
        std::fs::read(&path)
            .map(Cow::Owned)
            .map_err(|source| DatasetError::Read { path, source })
    }
}

/// Picks the directory source when `data_dir` is given, the embedded one otherwise.
pub fn open(data_dir: Option<&Path>) -> Arc<dyn DatasetSource> {
    match data_dir {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "using dataset directory");
            Arc::new(DirectoryDataset::new(dir))
        }
        None => Arc::new(EmbeddedDataset),
    }
}

pub fn read_quotes(source: &dyn DatasetSource) -> Result<Vec<Quote>, DatasetError> {
    let bytes = source.read(QUOTES_FILE)?;
    serde_json::from_slice(&bytes).map_err(|source| DatasetError::Decode {
        file: QUOTES_FILE,
        source,
    })
}

pub fn read_contributors(source: &dyn DatasetSource) -> Result<ContributorDirectory, DatasetError> {
    let bytes = source.read(CONTRIBUTORS_FILE)?;
    serde_json::from_slice(&bytes).map_err(|source| DatasetError::Decode {
        file: CONTRIBUTORS_FILE,
        source,
    })
}
