use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::actor::SubDocument;
use crate::library::{normalize_name, LibraryError, LibraryIndex, ReferenceLibrary};

/// A library together with its loaded name index.
#[derive(Clone)]
pub struct PreparedLibrary {
    library: Arc<dyn ReferenceLibrary>,
    name: String,
    /// Normalized name -> entity id; the first entry with a given name wins.
    by_name: HashMap<String, String>,
}

impl std::fmt::Debug for PreparedLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedLibrary")
            .field("name", &self.name)
            .field("entries", &self.by_name.len())
            .finish()
    }
}

impl PreparedLibrary {
    pub fn new(library: Arc<dyn ReferenceLibrary>, index: LibraryIndex) -> Self {
        let mut by_name = HashMap::new();
        for entry in index.entries {
            by_name.entry(normalize_name(&entry.name)).or_insert(entry.id);
        }
        Self {
            name: library.name(),
            library,
            by_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn lookup(&self, normalized: &str) -> Option<&str> {
        self.by_name.get(normalized).map(String::as_str)
    }

    pub async fn fetch(&self, id: &str) -> Result<Option<SubDocument>, LibraryError> {
        self.library.fetch(id).await
    }
}

/// Load every library's index concurrently. Libraries that fail to load are logged and left out.
pub async fn prepare_libraries(libraries: &[Arc<dyn ReferenceLibrary>]) -> Vec<PreparedLibrary> {
    let loads = libraries.iter().map(|library| async move {
        let result = library.load_index().await;
        (Arc::clone(library), result)
    });

    join_all(loads)
        .await
        .into_iter()
        .filter_map(|(library, result)| match result {
            Ok(index) => {
                let prepared = PreparedLibrary::new(library, index);
                debug!(library = prepared.name(), entries = prepared.len(), "library index ready");
                Some(prepared)
            }
            Err(err) => {
                warn!(library = %library.name(), error = %err, "reference library unavailable, skipping");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct LibraryMatch<'a> {
    pub library: &'a PreparedLibrary,
    pub id: &'a str,
}

/// Case-insensitive, trimmed exact match; the first library (in order) that has the name wins.
pub fn find<'a>(libraries: &'a [PreparedLibrary], name: &str) -> Option<LibraryMatch<'a>> {
    let normalized = normalize_name(name);
    libraries.iter().find_map(|library| {
        library
            .lookup(&normalized)
            .map(|id| LibraryMatch { library, id })
    })
}

/// Ordered libraries plus the alias table for one sub-document category.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMatcher {
    libraries: Vec<PreparedLibrary>,
    aliases: HashMap<String, String>,
}

impl ReferenceMatcher {
    pub fn new(libraries: Vec<PreparedLibrary>, aliases: &BTreeMap<String, String>) -> Self {
        let aliases = aliases
            .iter()
            .map(|(alias, target)| (normalize_name(alias), target.trim().to_string()))
            .collect();
        Self { libraries, aliases }
    }

    /// Name actually looked up: the alias target when `name` has one, otherwise `name`.
    pub fn lookup_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases
            .get(&normalize_name(name))
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn find(&self, name: &str) -> Option<LibraryMatch<'_>> {
        find(&self.libraries, self.lookup_name(name))
    }

    /// Fetch the matching entity, if any library has it.
    pub async fn resolve(&self, name: &str) -> Result<Option<SubDocument>, LibraryError> {
        let Some(found) = self.find(name) else {
            return Ok(None);
        };
        debug!(name, library = found.library.name(), id = found.id, "reference match");
        found.library.fetch(found.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{DocumentLibrary, IndexEntry, MockReferenceLibrary};

    fn doc(id: &str, name: &str) -> SubDocument {
        let mut doc = SubDocument::new(name, "weapon");
        doc.id = Some(id.to_string());
        doc
    }

    async fn prepared(name: &str, docs: Vec<SubDocument>) -> Vec<PreparedLibrary> {
        let library: Arc<dyn ReferenceLibrary> = Arc::new(DocumentLibrary::new(name, docs));
        prepare_libraries(&[library]).await
    }

    #[tokio::test]
    async fn find_ignores_case_and_surrounding_whitespace() {
        let libraries = prepared("srd", vec![doc("a1", "Longsword")]).await;
        let found = find(&libraries, " longsword ").expect("should match");
        assert_eq!(found.id, "a1");
        assert!(find(&libraries, "long sword").is_none());
    }

    #[tokio::test]
    async fn first_library_in_order_wins() {
        let world: Arc<dyn ReferenceLibrary> =
            Arc::new(DocumentLibrary::new("world", vec![doc("w1", "Shield")]));
        let srd: Arc<dyn ReferenceLibrary> =
            Arc::new(DocumentLibrary::new("srd", vec![doc("s1", "Shield")]));
        let libraries = prepare_libraries(&[world, srd]).await;
        let found = find(&libraries, "shield").expect("should match");
        assert_eq!(found.library.name(), "world");
        assert_eq!(found.id, "w1");
    }

    #[tokio::test]
    async fn alias_is_applied_even_when_raw_name_matches() {
        let libraries = prepared(
            "srd",
            vec![doc("raw", "Wooden Shield"), doc("aliased", "Shield")],
        )
        .await;
        let aliases = BTreeMap::from([("Wooden Shield".to_string(), "Shield".to_string())]);
        let matcher = ReferenceMatcher::new(libraries, &aliases);
        let found = matcher.find("wooden shield").expect("should match");
        assert_eq!(found.id, "aliased");
        let fetched = matcher
            .resolve("Wooden Shield")
            .await
            .expect("fetch should succeed")
            .expect("entity should exist");
        assert_eq!(fetched.name, "Shield");
    }

    #[tokio::test]
    async fn failing_library_is_skipped_during_preparation() {
        let mut broken = MockReferenceLibrary::new();
        broken.expect_name().return_const("broken".to_string());
        broken.expect_load_index().returning(|| {
            Err(LibraryError::Unavailable {
                library: "broken".to_string(),
                message: "offline".to_string(),
            })
        });
        let mut healthy = MockReferenceLibrary::new();
        healthy.expect_name().return_const("healthy".to_string());
        healthy.expect_load_index().returning(|| {
            Ok(LibraryIndex {
                entries: vec![IndexEntry {
                    id: "h1".to_string(),
                    name: "Dagger".to_string(),
                }],
            })
        });

        let libraries: Vec<Arc<dyn ReferenceLibrary>> = vec![Arc::new(broken), Arc::new(healthy)];
        let prepared = prepare_libraries(&libraries).await;
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].name(), "healthy");
    }
}
