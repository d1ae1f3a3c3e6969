//! File Catalog
//!
//! The fixed list of sample files the scheduler picks from. A catalog is
//! immutable once built and is never empty.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// Sample files served by the portfolio site
pub const DEFAULT_FILES: &[&str] = &[
    "/files/samples/index",
    "/files/samples/main",
    "/files/samples/network",
    "/files/samples/raspberry",
    "/files/samples/cache",
    "/files/samples/style",
];

/// Ordered, non-empty list of file identifiers (paths or URLs)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Catalog {
    files: Vec<String>,
}

impl Catalog {
    /// Build a catalog, rejecting an empty list
    pub fn new<I, T>(files: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let files: Vec<String> = files
            .into_iter()
            .map(Into::into)
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        if files.is_empty() {
            return Err(FolioError::EmptyCatalog);
        }

        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always `false`; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.files.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            files: DEFAULT_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Catalog {
    type Error = FolioError;

    fn try_from(files: Vec<String>) -> Result<Self> {
        Self::new(files)
    }
}

impl From<Catalog> for Vec<String> {
    fn from(catalog: Catalog) -> Self {
        catalog.files
    }
}
