use std::collections::{BTreeMap, HashMap};

use crate::actor::{TraitSet, Traits};
use crate::config::KnownTerms;
use crate::library::normalize_name;
use crate::source::{CharacterView, ProficiencyKind};

const DEFAULT_SIZE: &str = "med";
const CUSTOM_SEPARATOR: &str = ";";

/// Known terms become keys; anything else is kept verbatim in `custom`.
pub fn proficiency_trait_set(
    view: &CharacterView<'_>,
    kind: ProficiencyKind,
    known: &BTreeMap<String, String>,
) -> TraitSet {
    let lookup: HashMap<String, &String> = known
        .iter()
        .map(|(term, key)| (normalize_name(term), key))
        .collect();

    let mut value: Vec<String> = Vec::new();
    let mut custom: Vec<String> = Vec::new();
    for prof in view.proficiencies().filter(|prof| prof.kind == kind) {
        match lookup.get(&normalize_name(&prof.name)) {
            Some(key) => {
                if !value.iter().any(|existing| existing == *key) {
                    value.push((*key).clone());
                }
            }
            None => {
                let term = prof.name.trim();
                if !term.is_empty() && !custom.iter().any(|existing| existing == term) {
                    custom.push(term.to_string());
                }
            }
        }
    }

    TraitSet {
        value,
        custom: custom.join(CUSTOM_SEPARATOR),
    }
}

pub fn map_traits(view: &CharacterView<'_>, known: &KnownTerms) -> Traits {
    Traits {
        size: DEFAULT_SIZE.to_string(),
        di: TraitSet::default(),
        dr: TraitSet::default(),
        dv: TraitSet::default(),
        ci: TraitSet::default(),
        languages: proficiency_trait_set(view, ProficiencyKind::Language, &known.languages),
        tool_prof: proficiency_trait_set(view, ProficiencyKind::Tool, &known.tools),
        armor_prof: proficiency_trait_set(view, ProficiencyKind::Armor, &known.armor),
        weapon_prof: proficiency_trait_set(view, ProficiencyKind::Weapon, &known.weapons),
    }
}
