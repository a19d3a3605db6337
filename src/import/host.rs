//! Port to the host application's document storage.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::actor::{ActorDocument, SubDocument};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("host storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    #[error("failed to access world file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize world file '{path}': {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HostError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn storage(operation: &'static str, message: impl ToString) -> Self {
        Self::Storage {
            operation,
            message: message.to_string(),
        }
    }
}

/// An actor already present in the host, found by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingActor {
    pub id: String,
    pub name: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Exact, case-sensitive match on the actor's display name.
    async fn find_actor_by_name(&self, name: &str) -> Result<Option<ExistingActor>, HostError>;

    /// Create a top-level actor; the host assigns and returns its id.
    async fn create_actor(&self, actor: &ActorDocument) -> Result<String, HostError>;

    /// Replace the actor's top-level fields. `img` and `token` left as `None` keep their stored values.
    async fn update_actor(&self, id: &str, actor: &ActorDocument) -> Result<(), HostError>;

    /// Ids of every sub-document attached to the actor.
    async fn list_embedded(&self, actor_id: &str) -> Result<Vec<String>, HostError>;

    async fn create_embedded(
        &self,
        actor_id: &str,
        documents: &[SubDocument],
    ) -> Result<Vec<String>, HostError>;

    async fn delete_embedded(&self, actor_id: &str, ids: &[String]) -> Result<(), HostError>;
}
