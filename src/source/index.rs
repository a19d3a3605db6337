//! Per-character views over a (possibly multi-character) export.

use std::collections::BTreeMap;

use crate::source::model::{
    ClassRecord, EffectRecord, FeatureRecord, ItemRecord, ProficiencyRecord, SourceDocument,
    SpellListRecord, SpellRecord, TemporaryHitPointsRecord,
};

/// Effects of one character grouped by stat, list order preserved within each stat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectIndex {
    by_stat: BTreeMap<String, Vec<EffectRecord>>,
}

impl EffectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every effect owned by `char_id`.
    pub fn for_character(doc: &SourceDocument, char_id: &str) -> Self {
        let mut index = Self::new();
        for effect in doc
            .collections
            .effects
            .iter()
            .filter(|effect| effect.char_id == char_id)
        {
            index.push(effect.clone());
        }
        index
    }

    pub fn push(&mut self, effect: EffectRecord) {
        self.by_stat
            .entry(effect.stat.clone())
            .or_default()
            .push(effect);
    }

    pub fn effects_for(&self, stat: &str) -> &[EffectRecord] {
        self.by_stat.get(stat).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_stat(&self, stat: &str) -> bool {
        self.by_stat.contains_key(stat)
    }

    pub fn stats(&self) -> impl Iterator<Item = &str> {
        self.by_stat.keys().map(String::as_str)
    }
}

impl FromIterator<EffectRecord> for EffectIndex {
    fn from_iter<I: IntoIterator<Item = EffectRecord>>(iter: I) -> Self {
        let mut index = Self::new();
        for effect in iter {
            index.push(effect);
        }
        index
    }
}

/// Borrowed view of the records belonging to the exported character.
#[derive(Debug, Clone, Copy)]
pub struct CharacterView<'a> {
    pub doc: &'a SourceDocument,
}

impl<'a> CharacterView<'a> {
    pub fn new(doc: &'a SourceDocument) -> Self {
        Self { doc }
    }

    pub fn char_id(&self) -> &'a str {
        &self.doc.character.id
    }

    pub fn proficiencies(&self) -> impl Iterator<Item = &'a ProficiencyRecord> + 'a {
        let id = self.char_id();
        self.doc
            .collections
            .proficiencies
            .iter()
            .filter(move |prof| prof.enabled && prof.char_id == id)
    }

    pub fn classes(&self) -> impl Iterator<Item = &'a ClassRecord> + 'a {
        let id = self.char_id();
        self.doc
            .collections
            .classes
            .iter()
            .filter(move |class| class.char_id == id)
    }

    pub fn items(&self) -> impl Iterator<Item = &'a ItemRecord> + 'a {
        let id = self.char_id();
        self.doc
            .collections
            .items
            .iter()
            .filter(move |item| item.char_id == id)
    }

    pub fn spells(&self) -> impl Iterator<Item = &'a SpellRecord> + 'a {
        let id = self.char_id();
        self.doc
            .collections
            .spells
            .iter()
            .filter(move |spell| spell.char_id == id)
    }

    pub fn features(&self) -> impl Iterator<Item = &'a FeatureRecord> + 'a {
        let id = self.char_id();
        self.doc
            .collections
            .features
            .iter()
            .filter(move |feature| feature.enabled && feature.char_id == id)
    }

    pub fn spell_list(&self) -> Option<&'a SpellListRecord> {
        let id = self.char_id();
        self.doc
            .collections
            .spell_lists
            .iter()
            .find(|list| list.char_id == id)
    }

    pub fn temporary_hit_points(&self) -> Option<&'a TemporaryHitPointsRecord> {
        let id = self.char_id();
        self.doc
            .collections
            .temporary_hit_points
            .iter()
            .find(|grant| grant.char_id == id)
    }

    /// Ids of this character's containers whose display name is in `names`.
    pub fn container_ids_named(&self, names: &[String]) -> Vec<&'a str> {
        let id = self.char_id();
        self.doc
            .collections
            .containers
            .iter()
            .filter(|container| container.char_id == id && names.contains(&container.name))
            .map(|container| container.id.as_str())
            .collect()
    }

    /// Sum of levels across all of this character's classes.
    pub fn total_level(&self) -> u32 {
        self.classes().map(|class| class.level).sum()
    }
}
