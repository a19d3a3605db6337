//! Field mappers: DiceCloud export -> dnd5e actor sections.
//!
//! Every mapper is a pure function of the export (plus the effect resolver and config), so
//! translating the same export twice produces identical documents.

pub mod abilities;
pub mod attributes;
pub mod currency;
pub mod details;
pub mod embedded;
pub mod markdown;
pub mod skills;
pub mod traits;

pub use embedded::{Category, Enrichment, PendingEntry, SubDocumentPlan};

use crate::actor::{
    ActorData, ActorDocument, ActorFlags, ImportFlags, TokenData, CHARACTER_ACTOR_TYPE,
};
use crate::config::TranslatorConfig;
use crate::effects::{CharacterContext, Resolver};
use crate::error::TranslateError;
use crate::source::{CharacterView, EffectIndex, SourceDocument};

/// Output of [`translate`]: the top-level actor and the sub-documents still to be matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub actor: ActorDocument,
    pub sub_documents: SubDocumentPlan,
}

pub fn translate(
    doc: &SourceDocument,
    config: &TranslatorConfig,
) -> Result<Translation, TranslateError> {
    let view = CharacterView::new(doc);
    let index = EffectIndex::for_character(doc, view.char_id());
    let context = CharacterContext {
        level: view.total_level(),
        hit_point_adjustment: doc.character.hit_points.adjustment,
    };
    let resolver = Resolver::new(&index, context);

    let abilities = abilities::map_abilities(&view, &resolver)?;
    let attributes = attributes::map_attributes(&view, &resolver, &abilities)?;

    let name = doc.character.name.clone();
    let img = doc
        .character
        .picture
        .as_deref()
        .map(str::trim)
        .filter(|picture| !picture.is_empty())
        .unwrap_or(config.default_image.as_str())
        .to_string();

    let actor = ActorDocument {
        id: None,
        name: name.clone(),
        kind: CHARACTER_ACTOR_TYPE.to_string(),
        img: Some(img),
        token: Some(TokenData {
            name,
            img: config.default_image.clone(),
        }),
        data: ActorData {
            abilities,
            attributes,
            details: details::map_details(&view),
            currency: currency::map_currency(&view, config),
            traits: traits::map_traits(&view, &config.known_terms),
            skills: skills::map_skills(&view),
        },
        flags: ActorFlags {
            import: ImportFlags {
                source_id: view.char_id().to_string(),
                advantage: resolver.advantage_tallies()?,
            },
        },
    };

    Ok(Translation {
        actor,
        sub_documents: SubDocumentPlan::build(&view, config),
    })
}
