//! dnd5e actor document as written to the host. Maps are ordered so output is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CHARACTER_ACTOR_TYPE: &str = "character";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenData>,
    pub data: ActorData,
    #[serde(default)]
    pub flags: ActorFlags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenData {
    pub name: String,
    pub img: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorFlags {
    #[serde(rename = "dicecloud-import", default)]
    pub import: ImportFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFlags {
    pub source_id: String,
    /// Net advantage per stat; positive is advantage. Not clamped to a single degree.
    #[serde(default)]
    pub advantage: BTreeMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorData {
    pub abilities: BTreeMap<String, AbilityScore>,
    pub attributes: Attributes,
    pub details: Details,
    pub currency: Currency,
    pub traits: Traits,
    pub skills: BTreeMap<String, SkillEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub value: f64,
    pub proficient: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub ac: ArmorClass,
    pub hp: HitPoints,
    pub init: Initiative,
    pub movement: Movement,
    pub senses: Senses,
    pub spellcasting: String,
    pub spelldc: f64,
    pub prof: u32,
    pub hd: u32,
    pub death: DeathSaves,
    pub inspiration: bool,
    pub exhaustion: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorClass {
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitPoints {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempmax: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Initiative {
    pub value: f64,
    pub bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub walk: f64,
    pub fly: f64,
    pub swim: f64,
    pub climb: f64,
    pub burrow: f64,
    pub hover: bool,
    pub units: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Senses {
    pub darkvision: f64,
    pub blindsight: f64,
    pub tremorsense: f64,
    pub truesight: f64,
    pub special: String,
    pub units: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeathSaves {
    pub success: u32,
    pub failure: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Details {
    pub alignment: String,
    pub race: String,
    pub background: String,
    pub biography: RichText,
    #[serde(rename = "trait")]
    pub personality: String,
    pub ideal: String,
    pub bond: String,
    pub flaw: String,
    pub appearance: String,
    pub level: u32,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub cp: i64,
    pub sp: i64,
    pub ep: i64,
    pub gp: i64,
    pub pp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traits {
    pub size: String,
    pub di: TraitSet,
    pub dr: TraitSet,
    pub dv: TraitSet,
    pub ci: TraitSet,
    pub languages: TraitSet,
    pub tool_prof: TraitSet,
    pub armor_prof: TraitSet,
    pub weapon_prof: TraitSet,
}

/// Known keys plus `;`-separated free text for terms outside the known table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitSet {
    pub value: Vec<String>,
    pub custom: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub value: f64,
    pub ability: String,
}

/// An item, spell, class, or feature attached to an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl SubDocument {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind: kind.into(),
            img: None,
            data: Map::new(),
        }
    }

    /// Set `data.<path...>`, creating intermediate objects and replacing non-object values.
    pub fn set_data(&mut self, path: &[&str], value: Value) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut target = &mut self.data;
        for key in parents {
            let slot = target
                .entry((*key).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(map) = slot else {
                return;
            };
            target = map;
        }
        target.insert((*last).to_string(), value);
    }

    pub fn with_data(mut self, path: &[&str], value: Value) -> Self {
        self.set_data(path, value);
        self
    }
}
