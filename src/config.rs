//! Translator tables: currency names, alias maps, known proficiency terms, library names.
//! Built-in defaults cover the DiceCloud → dnd5e SRD case; a YAML file can override any table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a YAML config file.
pub const CONFIG_PATH_ENV: &str = "DICECLOUD_IMPORT_CONFIG";

pub const DEFAULT_ACTOR_IMAGE: &str = "icons/svg/mystery-man.png";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Image for newly created actors and their tokens when the export has no picture.
    pub default_image: String,
    /// Denomination key (`cp`, `sp`, `ep`, `gp`, `pp`) -> inventory display name.
    pub currency: BTreeMap<String, String>,
    /// Items inside containers with these names are not imported.
    pub ignored_containers: Vec<String>,
    pub aliases: AliasTables,
    pub known_terms: KnownTerms,
    pub libraries: LibraryNames,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            default_image: DEFAULT_ACTOR_IMAGE.to_string(),
            currency: pairs(&[
                ("cp", "Copper piece"),
                ("sp", "Silver piece"),
                ("ep", "Electrum piece"),
                ("gp", "Gold piece"),
                ("pp", "Platinum piece"),
            ]),
            ignored_containers: vec!["Robe of Useful Items".to_string()],
            aliases: AliasTables::default(),
            known_terms: KnownTerms::default(),
            libraries: LibraryNames::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config named by [`CONFIG_PATH_ENV`], or the built-in defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// Inventory display names that count as coins rather than items.
    pub fn currency_names(&self) -> Vec<String> {
        self.currency.values().cloned().collect()
    }
}

/// Source name -> reference-library name, consulted before lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasTables {
    pub items: BTreeMap<String, String>,
    pub spells: BTreeMap<String, String>,
    pub classes: BTreeMap<String, String>,
    pub features: BTreeMap<String, String>,
}

impl Default for AliasTables {
    fn default() -> Self {
        Self {
            items: pairs(&[
                ("Clothes, common", "Common Clothes"),
                ("Clothes, costume", "Costume Clothes"),
                ("Clothes, fine", "Fine Clothes"),
                ("Clothes, traveler's", "Traveler's Clothes"),
                ("Wooden Shield", "Shield"),
                ("Rations (1 day)", "Rations"),
                ("Wooden staff (druidic focus)", "Wooden Staff"),
                ("Paper (one sheet)", "Paper"),
                ("Ink (1 ounce bottle)", "Ink Bottle"),
                ("Rope, hempen (50 feet)", "Hempen Rope (50 ft.)"),
                ("Oil (flask)", "Oil Flask"),
                ("Case, map or scroll", "Map or Scroll Case"),
                ("Perfume (vial)", "Perfume"),
            ]),
            spells: BTreeMap::new(),
            classes: BTreeMap::new(),
            features: BTreeMap::new(),
        }
    }
}

/// Display term -> dnd5e trait key for each proficiency family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnownTerms {
    pub languages: BTreeMap<String, String>,
    pub tools: BTreeMap<String, String>,
    pub armor: BTreeMap<String, String>,
    pub weapons: BTreeMap<String, String>,
}

impl Default for KnownTerms {
    fn default() -> Self {
        Self {
            languages: pairs(&[
                ("Common", "common"),
                ("Dwarvish", "dwarvish"),
                ("Elvish", "elvish"),
                ("Giant", "giant"),
                ("Gnomish", "gnomish"),
                ("Goblin", "goblin"),
                ("Halfling", "halfling"),
                ("Orc", "orc"),
                ("Abyssal", "abyssal"),
                ("Celestial", "celestial"),
                ("Draconic", "draconic"),
                ("Deep Speech", "deep"),
                ("Infernal", "infernal"),
                ("Primordial", "primordial"),
                ("Sylvan", "sylvan"),
                ("Undercommon", "undercommon"),
                ("Druidic", "druidic"),
                ("Thieves' Cant", "cant"),
                ("Aquan", "aquan"),
                ("Auran", "auran"),
                ("Ignan", "ignan"),
                ("Terran", "terran"),
                ("Gith", "gith"),
            ]),
            tools: pairs(&[
                ("Artisan's Tools", "art"),
                ("Disguise Kit", "disg"),
                ("Forgery Kit", "forg"),
                ("Gaming Set", "game"),
                ("Herbalism Kit", "herb"),
                ("Musical Instrument", "music"),
                ("Navigator's Tools", "navg"),
                ("Poisoner's Kit", "pois"),
                ("Thieves' Tools", "thief"),
                ("Vehicles (Land)", "vehicle"),
                ("Vehicles (Water)", "vehicle"),
            ]),
            armor: pairs(&[
                ("Light Armor", "lgt"),
                ("Medium Armor", "med"),
                ("Heavy Armor", "hvy"),
                ("Shields", "shl"),
            ]),
            weapons: pairs(&[("Simple Weapons", "sim"), ("Martial Weapons", "mar")]),
        }
    }
}

/// Reference libraries searched per sub-document category, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryNames {
    pub items: Vec<String>,
    pub spells: Vec<String>,
    pub classes: Vec<String>,
    pub features: Vec<String>,
}

impl Default for LibraryNames {
    fn default() -> Self {
        Self {
            items: vec!["dnd5e.items".to_string()],
            spells: vec!["dnd5e.spells".to_string()],
            classes: vec!["dnd5e.classes".to_string()],
            features: vec!["dnd5e.classfeatures".to_string(), "dnd5e.races".to_string()],
        }
    }
}

fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_tables() {
        let config: TranslatorConfig = serde_yaml::from_str(
            "aliases:\n  items:\n    Longsword (silvered): Longsword\nignored_containers: []\n",
        )
        .expect("yaml should parse");
        assert_eq!(
            config.aliases.items.get("Longsword (silvered)").map(String::as_str),
            Some("Longsword")
        );
        assert!(config.aliases.items.get("Wooden Shield").is_none());
        assert!(config.ignored_containers.is_empty());
        assert_eq!(config.currency.get("gp").map(String::as_str), Some("Gold piece"));
        assert_eq!(config.known_terms.armor.get("Shields").map(String::as_str), Some("shl"));
        assert_eq!(config.default_image, DEFAULT_ACTOR_IMAGE);
    }

    #[test]
    fn example_config_parses() {
        let config: TranslatorConfig =
            serde_yaml::from_str(include_str!("../config/translator.example.yaml"))
                .expect("example config should parse");
        assert_eq!(config.ignored_containers.len(), 2);
        assert_eq!(
            config.aliases.spells.get("Tasha's Hideous Laughter").map(String::as_str),
            Some("Hideous Laughter")
        );
        assert_eq!(config.known_terms.languages.len(), 4);
        assert!(!config.known_terms.tools.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = TranslatorConfig::load(Path::new("/nonexistent/dicecloud-import.yaml"))
            .expect_err("missing file should fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
