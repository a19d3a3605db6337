//! Translate DiceCloud character exports into dnd5e actor documents and import them into a
//! document store.

pub mod actor;
pub mod cli;
pub mod config;
pub mod effects;
pub mod error;
pub mod import;
pub mod library;
pub mod mapping;
pub mod source;

pub use config::TranslatorConfig;
pub use error::TranslateError;
pub use import::{import_character, ImportError, ImportHost, ImportOptions, ImportOutcome};
pub use mapping::{translate, Translation};
pub use source::{parse_source, SourceDocument};
