use std::collections::BTreeMap;

use tracing::info;

use crate::actor::{
    AbilityScore, ArmorClass, Attributes, DeathSaves, HitPoints, Initiative, Movement, Senses,
};
use crate::effects::{ability_modifier, Resolver, LEVEL_TIMES_CONSTITUTION_MOD};
use crate::error::TranslateError;
use crate::source::CharacterView;

/// Attack-bonus formula token -> caster ability key, in preference order.
pub const CASTER_ABILITY_TOKENS: [(&str, &str); 3] = [
    ("intelligenceMod", "int"),
    ("wisdomMod", "wis"),
    ("charismaMod", "cha"),
];

pub const DEFAULT_WALK_SPEED: f64 = 30.0;
pub const DEFAULT_ARMOR: f64 = 10.0;
const DISTANCE_UNITS: &str = "ft";

/// Caster ability inferred from the character's first spell list.
/// `Ok(None)` when the character has no spell list at all.
pub fn infer_spellcasting(
    view: &CharacterView<'_>,
) -> Result<Option<&'static str>, TranslateError> {
    let Some(list) = view.spell_list() else {
        info!(character = view.char_id(), "no spell list, leaving spellcasting ability empty");
        return Ok(None);
    };
    CASTER_ABILITY_TOKENS
        .iter()
        .find(|(token, _)| list.attack_bonus.contains(token))
        .map(|(_, key)| Some(*key))
        .ok_or_else(|| TranslateError::SpellcastingAbility {
            formula: list.attack_bonus.clone(),
        })
}

pub fn proficiency_bonus(level: u32) -> u32 {
    2 + level.saturating_sub(1) / 4
}

pub fn map_attributes(
    view: &CharacterView<'_>,
    resolver: &Resolver<'_>,
    abilities: &BTreeMap<String, AbilityScore>,
) -> Result<Attributes, TranslateError> {
    let context = resolver.context();
    let spellcasting = infer_spellcasting(view)?;
    let prof = proficiency_bonus(context.level);
    let spelldc = spellcasting
        .and_then(|key| abilities.get(key))
        .map(|score| 8.0 + f64::from(prof) + ability_modifier(score.value) as f64)
        .unwrap_or(10.0);

    let walk = resolver.resolve("speed", DEFAULT_WALK_SPEED)?.value;
    let armor = resolver.resolve("armor", DEFAULT_ARMOR)?.value;

    let hp_default = resolver.calculate(LEVEL_TIMES_CONSTITUTION_MOD)?;
    let max = resolver.resolve("hitPoints", hp_default)?.value;
    let temp = view.temporary_hit_points();
    let hp = HitPoints {
        value: max + context.hit_point_adjustment,
        min: 0.0,
        max,
        temp: temp.map(|grant| grant.maximum - grant.used),
        tempmax: temp.map(|grant| grant.maximum),
    };

    Ok(Attributes {
        ac: ArmorClass { value: armor },
        hp,
        init: Initiative {
            value: 0.0,
            bonus: resolver.resolve_optional("initiative", 0.0)?.value,
        },
        movement: Movement {
            walk,
            fly: resolver.resolve_optional("flySpeed", 0.0)?.value,
            swim: resolver.resolve_optional("swimSpeed", 0.0)?.value,
            climb: resolver.resolve_optional("climbSpeed", 0.0)?.value,
            burrow: resolver.resolve_optional("burrowSpeed", 0.0)?.value,
            hover: false,
            units: DISTANCE_UNITS.to_string(),
        },
        senses: Senses {
            darkvision: resolver.resolve_optional("darkvision", 0.0)?.value,
            blindsight: resolver.resolve_optional("blindsight", 0.0)?.value,
            tremorsense: resolver.resolve_optional("tremorsense", 0.0)?.value,
            truesight: resolver.resolve_optional("truesight", 0.0)?.value,
            special: String::new(),
            units: DISTANCE_UNITS.to_string(),
        },
        spellcasting: spellcasting.unwrap_or_default().to_string(),
        spelldc,
        prof,
        hd: context.level,
        death: DeathSaves::default(),
        inspiration: false,
        exhaustion: 0,
    })
}
