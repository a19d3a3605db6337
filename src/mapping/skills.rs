use std::collections::BTreeMap;

use tracing::warn;

use crate::actor::SkillEntry;
use crate::source::{CharacterView, ProficiencyKind};

/// DiceCloud skill name, dnd5e skill key, governing ability key.
pub const SKILLS: [(&str, &str, &str); 18] = [
    ("acrobatics", "acr", "dex"),
    ("animalHandling", "ani", "wis"),
    ("arcana", "arc", "int"),
    ("athletics", "ath", "str"),
    ("deception", "dec", "cha"),
    ("history", "his", "int"),
    ("insight", "ins", "wis"),
    ("intimidation", "itm", "cha"),
    ("investigation", "inv", "int"),
    ("medicine", "med", "wis"),
    ("nature", "nat", "int"),
    ("perception", "prc", "wis"),
    ("performance", "prf", "cha"),
    ("persuasion", "per", "cha"),
    ("religion", "rel", "int"),
    ("sleightOfHand", "slt", "dex"),
    ("stealth", "ste", "dex"),
    ("survival", "sur", "wis"),
];

/// Highest enabled skill proficiency for `skill`, 0 when none.
fn proficiency_multiplier(view: &CharacterView<'_>, skill: &str) -> f64 {
    view.proficiencies()
        .filter(|prof| prof.kind == ProficiencyKind::Skill && prof.name == skill)
        .map(|prof| prof.value)
        .fold(0.0, f64::max)
}

pub fn map_skills(view: &CharacterView<'_>) -> BTreeMap<String, SkillEntry> {
    let character = &view.doc.character;
    let mut skills = BTreeMap::new();
    for (name, key, ability) in SKILLS {
        if character.skill_ability(name).is_none() {
            warn!(skill = name, "character has no governing ability for skill, skipping");
            continue;
        }
        skills.insert(
            key.to_string(),
            SkillEntry {
                value: proficiency_multiplier(view, name),
                ability: ability.to_string(),
            },
        );
    }
    skills
}
