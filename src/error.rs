//! Fatal translation errors. Anything recoverable is logged where it happens instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("failed to parse character export: {0}")]
    Parse(#[source] serde_json::Error),

    /// An enabled effect carried neither a value nor a calculation.
    #[error("could not determine effect value for {stat} ({operation})")]
    MissingEffectValue { stat: String, operation: String },

    #[error("could not apply save proficiency '{name}': no ability named '{ability}'")]
    UnknownSaveAbility { name: String, ability: String },

    #[error("could not determine spellcasting ability from '{formula}'")]
    SpellcastingAbility { formula: String },
}
