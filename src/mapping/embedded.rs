//! Sub-documents planned from the export: what to look up, and what to attach if nothing matches.

use serde::Serialize;
use serde_json::{json, Value};

use crate::actor::SubDocument;
use crate::config::TranslatorConfig;
use crate::mapping::details::SOURCE_LABEL;
use crate::mapping::markdown::body_text;
use crate::source::{CharacterView, ClassRecord, FeatureRecord, ItemRecord, SpellRecord};

/// Sub-document families, in the order they are attached to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Classes,
    Items,
    Spells,
    Features,
}

impl Category {
    pub const POPULATION_ORDER: [Category; 4] = [
        Category::Classes,
        Category::Items,
        Category::Spells,
        Category::Features,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Items => "items",
            Self::Spells => "spells",
            Self::Features => "features",
        }
    }
}

/// Per-record values copied onto a matched library entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Item { quantity: i64, equipped: bool },
    Class { levels: u32 },
    Spell { prepared: bool },
    Nothing,
}

impl Enrichment {
    pub fn apply(&self, doc: &mut SubDocument) {
        match self {
            Self::Item { quantity, equipped } => {
                doc.set_data(&["quantity"], json!(quantity));
                doc.set_data(&["equipped"], json!(equipped));
            }
            Self::Class { levels } => doc.set_data(&["levels"], json!(levels)),
            Self::Spell { prepared } => doc.set_data(&["preparation", "prepared"], json!(prepared)),
            Self::Nothing => {}
        }
    }
}

/// One export record to be resolved against reference libraries.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub name: String,
    pub enrichment: Enrichment,
    /// Attached as-is when no library has the name.
    pub fallback: SubDocument,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubDocumentPlan {
    pub classes: Vec<PendingEntry>,
    pub items: Vec<PendingEntry>,
    pub spells: Vec<PendingEntry>,
    pub features: Vec<PendingEntry>,
}

impl SubDocumentPlan {
    pub fn build(view: &CharacterView<'_>, config: &TranslatorConfig) -> Self {
        let currency_names = config.currency_names();
        let ignored_containers = view.container_ids_named(&config.ignored_containers);

        Self {
            classes: view.classes().map(class_entry).collect(),
            items: view
                .items()
                .filter(|item| !currency_names.contains(&item.name))
                .filter(|item| !ignored_containers.contains(&item.parent.id.as_str()))
                .map(item_entry)
                .collect(),
            spells: view.spells().map(spell_entry).collect(),
            features: view.features().map(feature_entry).collect(),
        }
    }

    pub fn entries(&self, category: Category) -> &[PendingEntry] {
        match category {
            Category::Classes => &self.classes,
            Category::Items => &self.items,
            Category::Spells => &self.spells,
            Category::Features => &self.features,
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len() + self.items.len() + self.spells.len() + self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn rich_text(raw: &str) -> Value {
    json!({ "value": body_text(raw) })
}

fn class_entry(class: &ClassRecord) -> PendingEntry {
    let enrichment = Enrichment::Class {
        levels: class.level,
    };
    let mut fallback = SubDocument::new(class.name.trim(), "class")
        .with_data(&["source"], json!(SOURCE_LABEL));
    enrichment.apply(&mut fallback);
    PendingEntry {
        name: class.name.clone(),
        enrichment,
        fallback,
    }
}

fn item_entry(item: &ItemRecord) -> PendingEntry {
    let enrichment = Enrichment::Item {
        quantity: item.quantity,
        equipped: item.enabled,
    };
    let mut fallback = SubDocument::new(item.name.trim(), "loot")
        .with_data(&["description"], rich_text(&item.description))
        .with_data(&["weight"], json!(item.weight))
        .with_data(&["price"], json!(item.value));
    enrichment.apply(&mut fallback);
    PendingEntry {
        name: item.name.clone(),
        enrichment,
        fallback,
    }
}

/// dnd5e school key for a DiceCloud school name; unknown schools pass through lowercased.
pub fn school_key(school: &str) -> String {
    match school.trim().to_lowercase().as_str() {
        "abjuration" => "abj".to_string(),
        "conjuration" => "con".to_string(),
        "divination" => "div".to_string(),
        "enchantment" => "enc".to_string(),
        "evocation" => "evo".to_string(),
        "illusion" => "ill".to_string(),
        "necromancy" => "nec".to_string(),
        "transmutation" => "trs".to_string(),
        other => other.to_string(),
    }
}

fn spell_entry(spell: &SpellRecord) -> PendingEntry {
    let enrichment = Enrichment::Spell {
        prepared: spell.is_prepared(),
    };
    let mode = if spell.prepared == "always" {
        "always"
    } else {
        "prepared"
    };
    let mut fallback = SubDocument::new(spell.name.trim(), "spell")
        .with_data(&["description"], rich_text(&spell.description))
        .with_data(&["level"], json!(spell.level))
        .with_data(&["school"], json!(school_key(&spell.school)))
        .with_data(&["components", "ritual"], json!(spell.ritual))
        .with_data(&["preparation", "mode"], json!(mode))
        .with_data(&["source"], json!(SOURCE_LABEL));
    enrichment.apply(&mut fallback);
    PendingEntry {
        name: spell.name.clone(),
        enrichment,
        fallback,
    }
}

fn feature_entry(feature: &FeatureRecord) -> PendingEntry {
    let fallback = SubDocument::new(feature.name.trim(), "feat")
        .with_data(&["description"], rich_text(&feature.description))
        .with_data(&["source"], json!(SOURCE_LABEL));
    PendingEntry {
        name: feature.name.clone(),
        enrichment: Enrichment::Nothing,
        fallback,
    }
}
