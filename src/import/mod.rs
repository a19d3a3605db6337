//! Import orchestration: translate an export, then create or update the actor in a host store
//! and attach its sub-documents.

pub mod host;
pub mod memory;
mod orchestrator;

pub use host::{DocumentStore, ExistingActor, HostError};
pub use memory::{MemoryStore, StoredActor, WorldSnapshot, WORLD_LIBRARY_NAME};
pub use orchestrator::{
    import_character, CategoryReport, ImportError, ImportHost, ImportOptions, ImportOutcome,
    PopulationReport,
};
