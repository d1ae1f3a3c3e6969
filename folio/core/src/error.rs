//! Error Types
//!
//! Library errors for the reel. Binaries wrap these in `anyhow`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;

/// Top-level error for the folio core
#[derive(Debug, Error)]
pub enum FolioError {
    /// A catalog needs at least one file to pick from
    #[error("Catalog is empty: nothing to pick from")]
    EmptyCatalog,

    /// Loading configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fetching a sample file failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Convenience alias used throughout the core
pub type Result<T> = std::result::Result<T, FolioError>;
