use std::collections::BTreeMap;

use crate::actor::AbilityScore;
use crate::effects::{Resolver, DEFAULT_ABILITY_SCORE};
use crate::error::TranslateError;
use crate::source::{CharacterView, ProficiencyKind};

/// DiceCloud ability stat -> dnd5e ability key.
pub const ABILITIES: [(&str, &str); 6] = [
    ("strength", "str"),
    ("dexterity", "dex"),
    ("constitution", "con"),
    ("intelligence", "int"),
    ("wisdom", "wis"),
    ("charisma", "cha"),
];

const SAVE_SUFFIX: &str = "Save";

pub fn ability_key(stat: &str) -> Option<&'static str> {
    ABILITIES
        .iter()
        .find(|(name, _)| *name == stat)
        .map(|(_, key)| *key)
}

pub fn map_abilities(
    view: &CharacterView<'_>,
    resolver: &Resolver<'_>,
) -> Result<BTreeMap<String, AbilityScore>, TranslateError> {
    let mut abilities = BTreeMap::new();
    for (stat, key) in ABILITIES {
        let resolution = resolver.resolve(stat, DEFAULT_ABILITY_SCORE)?;
        abilities.insert(
            key.to_string(),
            AbilityScore {
                value: resolution.value,
                proficient: 0.0,
            },
        );
    }

    for prof in view
        .proficiencies()
        .filter(|prof| prof.kind == ProficiencyKind::Save)
    {
        let stat = prof.name.strip_suffix(SAVE_SUFFIX).unwrap_or(&prof.name);
        let Some(score) = ability_key(stat).and_then(|key| abilities.get_mut(key)) else {
            return Err(TranslateError::UnknownSaveAbility {
                name: prof.name.clone(),
                ability: stat.to_string(),
            });
        };
        score.proficient = prof.value;
    }

    Ok(abilities)
}
