//! In-process document store, optionally backed by a JSON world file.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::actor::{ActorDocument, SubDocument};
use crate::import::host::{DocumentStore, ExistingActor, HostError};
use crate::library::DocumentLibrary;

/// Library name under which the world's own items are searched.
pub const WORLD_LIBRARY_NAME: &str = "world";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredActor {
    pub actor: ActorDocument,
    #[serde(default)]
    pub items: Vec<SubDocument>,
}

/// Everything a world file holds: actors with their attached items, plus world-level items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub actors: Vec<StoredActor>,
    #[serde(default)]
    pub items: Vec<SubDocument>,
}

impl WorldSnapshot {
    /// A missing file is an empty world.
    pub async fn load(path: &Path) -> Result<Self, HostError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "world file missing, starting empty");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(HostError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| HostError::Serialization {
            path: path.to_path_buf(),
            source,
        })
    }

    pub async fn save(&self, path: &Path) -> Result<(), HostError> {
        let raw = serde_json::to_string_pretty(self).map_err(|source| HostError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
        tokio::fs::write(path, raw)
            .await
            .map_err(|source| HostError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<WorldSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: WorldSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
        }
    }

    pub async fn snapshot(&self) -> WorldSnapshot {
        self.state.lock().await.clone()
    }

    pub async fn actor(&self, id: &str) -> Option<StoredActor> {
        self.state
            .lock()
            .await
            .actors
            .iter()
            .find(|stored| stored.actor.id.as_deref() == Some(id))
            .cloned()
    }

    /// World-level items as a reference library, searched ahead of the shared libraries.
    pub async fn world_library(&self) -> DocumentLibrary {
        DocumentLibrary::new(WORLD_LIBRARY_NAME, self.state.lock().await.items.clone())
    }
}

fn stored_mut<'a>(
    snapshot: &'a mut WorldSnapshot,
    id: &str,
) -> Result<&'a mut StoredActor, HostError> {
    snapshot
        .actors
        .iter_mut()
        .find(|stored| stored.actor.id.as_deref() == Some(id))
        .ok_or_else(|| HostError::not_found("actor", id))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_actor_by_name(&self, name: &str) -> Result<Option<ExistingActor>, HostError> {
        let state = self.state.lock().await;
        Ok(state
            .actors
            .iter()
            .find(|stored| stored.actor.name == name)
            .and_then(|stored| {
                stored.actor.id.as_ref().map(|id| ExistingActor {
                    id: id.clone(),
                    name: stored.actor.name.clone(),
                })
            }))
    }

    async fn create_actor(&self, actor: &ActorDocument) -> Result<String, HostError> {
        let id = new_id();
        let mut actor = actor.clone();
        actor.id = Some(id.clone());
        self.state.lock().await.actors.push(StoredActor {
            actor,
            items: Vec::new(),
        });
        Ok(id)
    }

    async fn update_actor(&self, id: &str, actor: &ActorDocument) -> Result<(), HostError> {
        let mut state = self.state.lock().await;
        let stored = stored_mut(&mut state, id)?;
        let mut updated = actor.clone();
        updated.id = Some(id.to_string());
        if updated.img.is_none() {
            updated.img = stored.actor.img.take();
        }
        if updated.token.is_none() {
            updated.token = stored.actor.token.take();
        }
        stored.actor = updated;
        Ok(())
    }

    async fn list_embedded(&self, actor_id: &str) -> Result<Vec<String>, HostError> {
        let mut state = self.state.lock().await;
        let stored = stored_mut(&mut state, actor_id)?;
        Ok(stored
            .items
            .iter()
            .filter_map(|item| item.id.clone())
            .collect())
    }

    async fn create_embedded(
        &self,
        actor_id: &str,
        documents: &[SubDocument],
    ) -> Result<Vec<String>, HostError> {
        let mut state = self.state.lock().await;
        let stored = stored_mut(&mut state, actor_id)?;
        let mut ids = Vec::with_capacity(documents.len());
        for document in documents {
            let id = new_id();
            let mut document = document.clone();
            document.id = Some(id.clone());
            stored.items.push(document);
            ids.push(id);
        }
        Ok(ids)
    }

    async fn delete_embedded(&self, actor_id: &str, ids: &[String]) -> Result<(), HostError> {
        let mut state = self.state.lock().await;
        let stored = stored_mut(&mut state, actor_id)?;
        stored
            .items
            .retain(|item| !item.id.as_ref().is_some_and(|id| ids.contains(id)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;
    use crate::mapping::translate;
    use crate::source::parse_source;

    fn actor(name: &str) -> ActorDocument {
        let raw = format!(
            r#"{{"character": {{"_id": "c1", "name": "{name}"}}, "collections": {{}}}}"#
        );
        let doc = parse_source(&raw).expect("export should parse");
        translate(&doc, &TranslatorConfig::default())
            .expect("translation should succeed")
            .actor
    }

    #[tokio::test]
    async fn update_keeps_stored_image_and_token_when_payload_omits_them() {
        let store = MemoryStore::new();
        let mut original = actor("Aria");
        original.img = Some("portraits/aria.png".to_string());
        let id = store.create_actor(&original).await.expect("create should succeed");

        let mut payload = actor("Aria");
        payload.img = None;
        payload.token = None;
        payload.data.details.level = 7;
        store.update_actor(&id, &payload).await.expect("update should succeed");

        let stored = store.actor(&id).await.expect("actor should exist");
        assert_eq!(stored.actor.img.as_deref(), Some("portraits/aria.png"));
        assert!(stored.actor.token.is_some());
        assert_eq!(stored.actor.data.details.level, 7);
    }

    #[tokio::test]
    async fn embedded_documents_round_trip_through_ids() {
        let store = MemoryStore::new();
        let id = store.create_actor(&actor("Bram")).await.expect("create should succeed");
        let created = store
            .create_embedded(
                &id,
                &[SubDocument::new("Rope", "loot"), SubDocument::new("Torch", "loot")],
            )
            .await
            .expect("create should succeed");
        assert_eq!(store.list_embedded(&id).await.expect("list"), created);

        store
            .delete_embedded(&id, &created[..1])
            .await
            .expect("delete should succeed");
        let stored = store.actor(&id).await.expect("actor should exist");
        let names: Vec<_> = stored.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Torch"]);
    }

    #[tokio::test]
    async fn unknown_actor_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .list_embedded("missing")
            .await
            .expect_err("unknown actor should fail");
        assert!(matches!(err, HostError::NotFound { kind: "actor", .. }));
    }

    #[tokio::test]
    async fn missing_world_file_loads_empty() {
        let snapshot = WorldSnapshot::load(Path::new("/nonexistent/world.json"))
            .await
            .expect("missing file should load as empty");
        assert_eq!(snapshot, WorldSnapshot::default());
    }
}
