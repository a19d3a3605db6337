//! DiceCloud export: parsing and per-character views.

mod index;
mod model;

pub use index::{CharacterView, EffectIndex};
pub use model::{
    CharacterRecord, ClassRecord, Collections, ContainerRecord, EffectOperation, EffectRecord,
    FeatureRecord, HitPointsField, ItemRecord, ParentRef, ProficiencyKind, ProficiencyRecord,
    SourceDocument, SpellListRecord, SpellRecord, TemporaryHitPointsRecord,
};

use crate::error::TranslateError;

/// Parse a pasted export blob.
pub fn parse_source(raw: &str) -> Result<SourceDocument, TranslateError> {
    serde_json::from_str(raw).map_err(TranslateError::Parse)
}
