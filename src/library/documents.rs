use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::actor::SubDocument;
use crate::library::{IndexEntry, LibraryError, LibraryIndex, ReferenceLibrary};

/// Library over documents already in memory. Entities without an `_id` are addressed by position.
#[derive(Debug, Clone, Default)]
pub struct DocumentLibrary {
    name: String,
    documents: Vec<SubDocument>,
}

impl DocumentLibrary {
    pub fn new(name: impl Into<String>, documents: Vec<SubDocument>) -> Self {
        Self {
            name: name.into(),
            documents,
        }
    }

    fn entry_id(position: usize, doc: &SubDocument) -> String {
        doc.id.clone().unwrap_or_else(|| position.to_string())
    }

    pub fn index(&self) -> LibraryIndex {
        LibraryIndex {
            entries: self
                .documents
                .iter()
                .enumerate()
                .map(|(position, doc)| IndexEntry {
                    id: Self::entry_id(position, doc),
                    name: doc.name.clone(),
                })
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<SubDocument> {
        self.documents
            .iter()
            .enumerate()
            .find(|(position, doc)| Self::entry_id(*position, doc) == id)
            .map(|(_, doc)| doc.clone())
    }
}

#[async_trait]
impl ReferenceLibrary for DocumentLibrary {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn load_index(&self) -> Result<LibraryIndex, LibraryError> {
        Ok(self.index())
    }

    async fn fetch(&self, id: &str) -> Result<Option<SubDocument>, LibraryError> {
        Ok(self.get(id))
    }
}

/// Library stored as `<dir>/<name>.json`, a JSON list of sub-documents. Read once, on first use.
#[derive(Debug)]
pub struct JsonFileLibrary {
    name: String,
    path: PathBuf,
    loaded: OnceCell<DocumentLibrary>,
}

impl JsonFileLibrary {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            loaded: OnceCell::new(),
        }
    }

    /// Library `name` inside `dir`.
    pub fn in_dir(dir: &Path, name: &str) -> Self {
        Self::new(name, dir.join(format!("{name}.json")))
    }

    async fn documents(&self) -> Result<&DocumentLibrary, LibraryError> {
        self.loaded
            .get_or_try_init(|| async {
                let raw = tokio::fs::read_to_string(&self.path)
                    .await
                    .map_err(|source| LibraryError::Read {
                        library: self.name.clone(),
                        source,
                    })?;
                let documents: Vec<SubDocument> =
                    serde_json::from_str(&raw).map_err(|source| LibraryError::Parse {
                        library: self.name.clone(),
                        source,
                    })?;
                Ok::<_, LibraryError>(DocumentLibrary::new(self.name.clone(), documents))
            })
            .await
    }
}

#[async_trait]
impl ReferenceLibrary for JsonFileLibrary {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn load_index(&self) -> Result<LibraryIndex, LibraryError> {
        Ok(self.documents().await?.index())
    }

    async fn fetch(&self, id: &str) -> Result<Option<SubDocument>, LibraryError> {
        Ok(self.documents().await?.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn document_library_addresses_unidentified_entries_by_position() {
        let mut sword = SubDocument::new("Longsword", "weapon");
        sword.id = Some("sword".to_string());
        let library = DocumentLibrary::new("srd", vec![SubDocument::new("Rope", "loot"), sword]);

        let index = library.load_index().await.expect("index should load");
        let ids: Vec<_> = index.entries.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "sword"]);

        let rope = library.fetch("0").await.expect("fetch should succeed");
        assert_eq!(rope.map(|doc| doc.name), Some("Rope".to_string()));
        assert!(library.fetch("missing").await.expect("fetch should succeed").is_none());
    }

    #[tokio::test]
    async fn missing_json_library_reports_read_error() {
        let library = JsonFileLibrary::new("dnd5e.items", "/nonexistent/dnd5e.items.json");
        let err = library.load_index().await.expect_err("missing file should fail");
        assert!(matches!(err, LibraryError::Read { .. }));
    }
}
