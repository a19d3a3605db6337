//! Serde model of a DiceCloud character export.
//! Only the fields the translator reads are typed; the character record keeps the rest as JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceDocument {
    pub character: CharacterRecord,
    #[serde(default)]
    pub collections: Collections,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub ideals: String,
    #[serde(default)]
    pub bonds: String,
    #[serde(default)]
    pub flaws: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub hit_points: HitPointsField,
    /// Everything else on the character, e.g. `acrobatics: { ability: "dexterity" }`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CharacterRecord {
    /// Governing ability recorded on the character for a DiceCloud skill name, if any.
    pub fn skill_ability(&self, skill: &str) -> Option<&str> {
        self.fields.get(skill)?.get("ability")?.as_str()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct HitPointsField {
    #[serde(default)]
    pub adjustment: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collections {
    #[serde(default)]
    pub effects: Vec<EffectRecord>,
    #[serde(default)]
    pub proficiencies: Vec<ProficiencyRecord>,
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub spells: Vec<SpellRecord>,
    #[serde(default)]
    pub features: Vec<FeatureRecord>,
    #[serde(default)]
    pub containers: Vec<ContainerRecord>,
    #[serde(default)]
    pub spell_lists: Vec<SpellListRecord>,
    #[serde(default)]
    pub temporary_hit_points: Vec<TemporaryHitPointsRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectOperation {
    Base,
    Add,
    Mul,
    Advantage,
    Disadvantage,
    /// DiceCloud operations the translator does not model (min, max, conditional, ...).
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectRecord {
    pub stat: String,
    pub operation: EffectOperation,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub calculation: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub char_id: String,
}

impl EffectRecord {
    pub fn new(stat: &str, operation: EffectOperation, value: f64) -> Self {
        Self {
            stat: stat.to_string(),
            operation,
            value: Some(value),
            calculation: None,
            enabled: true,
            char_id: String::new(),
        }
    }

    pub fn calculated(stat: &str, operation: EffectOperation, calculation: &str) -> Self {
        Self {
            stat: stat.to_string(),
            operation,
            value: None,
            calculation: Some(calculation.to_string()),
            enabled: true,
            char_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyKind {
    Save,
    Skill,
    Language,
    Tool,
    Armor,
    Weapon,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProficiencyRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProficiencyKind,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub char_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub char_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ParentRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub collection: String,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub parent: ParentRef,
    #[serde(default)]
    pub char_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub prepared: String,
    #[serde(default)]
    pub ritual: bool,
    #[serde(default)]
    pub char_id: String,
}

impl SpellRecord {
    /// "always" counts as prepared; DiceCloud uses it for domain and racial spells.
    pub fn is_prepared(&self) -> bool {
        matches!(self.prepared.as_str(), "prepared" | "always")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub char_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub char_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellListRecord {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub attack_bonus: String,
    #[serde(rename = "saveDC", default)]
    pub save_dc: String,
    #[serde(default)]
    pub char_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryHitPointsRecord {
    #[serde(default)]
    pub maximum: f64,
    #[serde(default)]
    pub used: f64,
    #[serde(default)]
    pub char_id: String,
}
