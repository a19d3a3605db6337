//! Reference libraries (compendium-style name -> entity collections) and name matching against them.

mod documents;
mod matcher;

pub use documents::{DocumentLibrary, JsonFileLibrary};
pub use matcher::{find, prepare_libraries, LibraryMatch, PreparedLibrary, ReferenceMatcher};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::SubDocument;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read library '{library}': {source}")]
    Read {
        library: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse library '{library}': {source}")]
    Parse {
        library: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("library '{library}' is unavailable: {message}")]
    Unavailable { library: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryIndex {
    pub entries: Vec<IndexEntry>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceLibrary: Send + Sync {
    fn name(&self) -> String;
    async fn load_index(&self) -> Result<LibraryIndex, LibraryError>;
    async fn fetch(&self, id: &str) -> Result<Option<SubDocument>, LibraryError>;
}

/// Lookup key for names: trimmed and lowercased, inner spacing left as is.
pub fn normalize_name(value: &str) -> String {
    value.trim().to_lowercase()
}
