use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::actor::SubDocument;
use crate::config::TranslatorConfig;
use crate::error::TranslateError;
use crate::import::host::{DocumentStore, HostError};
use crate::library::{prepare_libraries, PreparedLibrary, ReferenceLibrary, ReferenceMatcher};
use crate::mapping::{translate, Category, PendingEntry, SubDocumentPlan, Translation};
use crate::source::parse_source;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Overwrite an existing actor with the same name instead of stopping.
    pub update: bool,
}

/// Where the importer writes actors and which libraries it matches sub-documents against.
#[derive(Clone)]
pub struct ImportHost {
    pub store: Arc<dyn DocumentStore>,
    /// The world's own items, searched ahead of every shared library.
    pub world: Option<Arc<dyn ReferenceLibrary>>,
    /// Shared libraries by name, as listed in [`crate::config::LibraryNames`].
    pub libraries: HashMap<String, Arc<dyn ReferenceLibrary>>,
}

impl ImportHost {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            world: None,
            libraries: HashMap::new(),
        }
    }

    pub fn with_world(mut self, world: Arc<dyn ReferenceLibrary>) -> Self {
        self.world = Some(world);
        self
    }

    pub fn with_library(mut self, library: Arc<dyn ReferenceLibrary>) -> Self {
        self.libraries.insert(library.name(), library);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    /// Attached from a reference library.
    pub matched: usize,
    /// Attached as a freeform document built from the export.
    pub synthesized: usize,
    /// Set when the category was skipped; other categories still ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopulationReport {
    pub categories: BTreeMap<Category, CategoryReport>,
}

impl PopulationReport {
    pub fn attached(&self) -> usize {
        self.categories
            .values()
            .map(|report| report.matched + report.synthesized)
            .sum()
    }

    pub fn failed(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|(_, report)| report.failed.is_some())
            .map(|(category, _)| *category)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Created {
        id: String,
        name: String,
        report: PopulationReport,
    },
    Updated {
        id: String,
        name: String,
        report: PopulationReport,
    },
    /// Nothing was written.
    AlreadyExists { name: String },
}

impl ImportOutcome {
    /// User-facing notice for the outcome.
    pub fn notice(&self) -> String {
        match self {
            Self::Created { name, report, .. } => {
                format!("Imported {name} ({} embedded documents)", report.attached())
            }
            Self::Updated { name, report, .. } => {
                format!("Updated {name} ({} embedded documents)", report.attached())
            }
            Self::AlreadyExists { name } => format!(
                "{name} already exists; choose update to overwrite the existing actor"
            ),
        }
    }
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notice())
    }
}

/// Translate an export and write it to the host: create the actor, or replace an existing one
/// of the same name when `options.update` is set.
pub async fn import_character(
    raw_json: &str,
    options: ImportOptions,
    config: &TranslatorConfig,
    host: &ImportHost,
) -> Result<ImportOutcome, ImportError> {
    let doc = parse_source(raw_json)?;
    let Translation {
        mut actor,
        sub_documents,
    } = translate(&doc, config)?;
    let name = actor.name.clone();

    let Some(existing) = host.store.find_actor_by_name(&name).await? else {
        let id = host.store.create_actor(&actor).await?;
        info!(actor = %name, id = %id, "created actor");
        let report = populate(host, config, &id, &sub_documents).await;
        return Ok(ImportOutcome::Created { id, name, report });
    };

    if !options.update {
        warn!(actor = %name, id = %existing.id, "actor already exists, not updating");
        return Ok(ImportOutcome::AlreadyExists { name });
    }

    let attached = host.store.list_embedded(&existing.id).await?;
    if !attached.is_empty() {
        host.store.delete_embedded(&existing.id, &attached).await?;
        debug!(actor = %name, removed = attached.len(), "cleared embedded documents");
    }

    // Portrait and token stay whatever the user set in the host.
    actor.id = Some(existing.id.clone());
    actor.img = None;
    actor.token = None;
    host.store.update_actor(&existing.id, &actor).await?;
    info!(actor = %name, id = %existing.id, "updated actor");

    let report = populate(host, config, &existing.id, &sub_documents).await;
    Ok(ImportOutcome::Updated {
        id: existing.id,
        name,
        report,
    })
}

fn configured_names(config: &TranslatorConfig, category: Category) -> &[String] {
    match category {
        Category::Classes => &config.libraries.classes,
        Category::Items => &config.libraries.items,
        Category::Spells => &config.libraries.spells,
        Category::Features => &config.libraries.features,
    }
}

fn aliases(config: &TranslatorConfig, category: Category) -> &BTreeMap<String, String> {
    match category {
        Category::Classes => &config.aliases.classes,
        Category::Items => &config.aliases.items,
        Category::Spells => &config.aliases.spells,
        Category::Features => &config.aliases.features,
    }
}

/// Load every library any category needs, world included, once and concurrently, then build
/// one matcher per category.
async fn category_matchers(
    host: &ImportHost,
    config: &TranslatorConfig,
) -> BTreeMap<Category, ReferenceMatcher> {
    let mut wanted: Vec<Arc<dyn ReferenceLibrary>> = host.world.iter().cloned().collect();
    let mut seen: Vec<&str> = Vec::new();
    for category in Category::POPULATION_ORDER {
        for name in configured_names(config, category) {
            if seen.contains(&name.as_str()) {
                continue;
            }
            seen.push(name);
            match host.libraries.get(name) {
                Some(library) => wanted.push(Arc::clone(library)),
                None => warn!(library = %name, "reference library not registered, skipping"),
            }
        }
    }
    let mut prepared = prepare_libraries(&wanted).await;
    let world = host.world.as_ref().and_then(|world| {
        let name = world.name();
        let position = prepared.iter().position(|library| library.name() == name)?;
        Some(prepared.remove(position))
    });

    Category::POPULATION_ORDER
        .into_iter()
        .map(|category| {
            let libraries: Vec<PreparedLibrary> = world
                .iter()
                .cloned()
                .chain(configured_names(config, category).iter().filter_map(|name| {
                    prepared
                        .iter()
                        .find(|library| library.name() == name.as_str())
                        .cloned()
                }))
                .collect();
            (category, ReferenceMatcher::new(libraries, aliases(config, category)))
        })
        .collect()
}

async fn populate(
    host: &ImportHost,
    config: &TranslatorConfig,
    actor_id: &str,
    plan: &SubDocumentPlan,
) -> PopulationReport {
    let mut report = PopulationReport::default();
    if plan.is_empty() {
        return report;
    }
    let matchers = category_matchers(host, config).await;

    for category in Category::POPULATION_ORDER {
        let entries = plan.entries(category);
        if entries.is_empty() {
            continue;
        }
        let Some(matcher) = matchers.get(&category) else {
            continue;
        };
        let outcome = populate_category(host.store.as_ref(), matcher, actor_id, entries).await;
        let category_report = match outcome {
            Ok(category_report) => {
                debug!(
                    category = category.as_str(),
                    matched = category_report.matched,
                    synthesized = category_report.synthesized,
                    "attached embedded documents"
                );
                category_report
            }
            Err(err) => {
                error!(
                    category = category.as_str(),
                    error = %err,
                    "failed to attach embedded documents, skipping category"
                );
                CategoryReport {
                    failed: Some(err.to_string()),
                    ..CategoryReport::default()
                }
            }
        };
        report.categories.insert(category, category_report);
    }
    report
}

async fn populate_category(
    store: &dyn DocumentStore,
    matcher: &ReferenceMatcher,
    actor_id: &str,
    entries: &[PendingEntry],
) -> Result<CategoryReport, ImportError> {
    let mut report = CategoryReport::default();
    let mut documents = Vec::with_capacity(entries.len());
    for entry in entries {
        documents.push(match resolve_entry(matcher, entry).await {
            Some(document) => {
                report.matched += 1;
                document
            }
            None => {
                report.synthesized += 1;
                entry.fallback.clone()
            }
        });
    }
    store.create_embedded(actor_id, &documents).await?;
    Ok(report)
}

/// Library entity for the entry, enriched with the export's values. `None` means use the fallback.
async fn resolve_entry(matcher: &ReferenceMatcher, entry: &PendingEntry) -> Option<SubDocument> {
    match matcher.resolve(&entry.name).await {
        Ok(Some(mut document)) => {
            document.id = None;
            entry.enrichment.apply(&mut document);
            Some(document)
        }
        Ok(None) => {
            debug!(name = %entry.name, "no reference match, using freeform document");
            None
        }
        Err(err) => {
            warn!(name = %entry.name, error = %err, "reference fetch failed, using freeform document");
            None
        }
    }
}
