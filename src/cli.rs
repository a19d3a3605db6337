use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{TranslatorConfig, CONFIG_PATH_ENV};
use crate::import::{
    import_character, ImportHost, ImportOptions, ImportOutcome, MemoryStore, WorldSnapshot,
};
use crate::library::{JsonFileLibrary, ReferenceLibrary};
use crate::mapping::translate;
use crate::source::parse_source;

pub const DEFAULT_WORLD_PATH: &str = "dicecloud-world.json";

const USAGE: &str = "usage: dicecloud-import <translate|import|check-config>";
const IMPORT_USAGE: &str = "usage: dicecloud-import import <export.json> [--update] [--world <world.json>] [--libraries <dir>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Translate,
    Import,
    CheckConfig,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("translate") => Some(Command::Translate),
        Some("import") => Some(Command::Import),
        Some("check-config") => Some(Command::CheckConfig),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Translate) => handle_translate(args),
        Some(Command::Import) => handle_import(args),
        Some(Command::CheckConfig) => handle_check_config(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn load_config() -> Option<TranslatorConfig> {
    match TranslatorConfig::from_env() {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("config error: {err}");
            None
        }
    }
}

fn read_export(path: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) => {
            eprintln!("failed to read export '{path}': {err}");
            None
        }
    }
}

fn handle_translate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: dicecloud-import translate <export.json>");
        return 2;
    };
    let Some(config) = load_config() else {
        return 1;
    };
    let Some(raw) = read_export(path) else {
        return 1;
    };

    let translation = match parse_source(&raw).and_then(|doc| translate(&doc, &config)) {
        Ok(translation) => translation,
        Err(err) => {
            eprintln!("translate failed: {err}");
            return 1;
        }
    };

    match serde_json::to_string_pretty(&translation.actor) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize actor: {err}");
            1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportArgs {
    export: String,
    update: bool,
    world: PathBuf,
    libraries: Option<PathBuf>,
}

fn parse_import_args(args: &[String]) -> Option<ImportArgs> {
    let export = args.get(2)?.clone();
    let mut parsed = ImportArgs {
        export,
        update: false,
        world: PathBuf::from(DEFAULT_WORLD_PATH),
        libraries: None,
    };
    let mut rest = args.iter().skip(3);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--update" => parsed.update = true,
            "--world" => parsed.world = PathBuf::from(rest.next()?),
            "--libraries" => parsed.libraries = Some(PathBuf::from(rest.next()?)),
            _ => return None,
        }
    }
    Some(parsed)
}

fn handle_import(args: &[String]) -> i32 {
    let Some(parsed) = parse_import_args(args) else {
        eprintln!("{IMPORT_USAGE}");
        return 2;
    };
    let Some(config) = load_config() else {
        return 1;
    };
    let Some(raw) = read_export(&parsed.export) else {
        return 1;
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_import(&raw, &parsed, &config))
}

fn shared_libraries(config: &TranslatorConfig, dir: &Path) -> Vec<Arc<dyn ReferenceLibrary>> {
    let mut names: Vec<&String> = config
        .libraries
        .items
        .iter()
        .chain(&config.libraries.spells)
        .chain(&config.libraries.classes)
        .chain(&config.libraries.features)
        .collect();
    names.sort();
    names.dedup();
    names
        .into_iter()
        .map(|name| Arc::new(JsonFileLibrary::in_dir(dir, name)) as Arc<dyn ReferenceLibrary>)
        .collect()
}

async fn run_import(raw: &str, parsed: &ImportArgs, config: &TranslatorConfig) -> i32 {
    let snapshot = match WorldSnapshot::load(&parsed.world).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("import failed: {err}");
            return 1;
        }
    };
    let has_world_items = !snapshot.items.is_empty();
    let store = Arc::new(MemoryStore::from_snapshot(snapshot));

    let mut host = ImportHost::new(store.clone());
    if has_world_items {
        host = host.with_world(Arc::new(store.world_library().await));
    }
    if let Some(dir) = &parsed.libraries {
        for library in shared_libraries(config, dir) {
            host = host.with_library(library);
        }
    }

    let options = ImportOptions {
        update: parsed.update,
    };
    let outcome = match import_character(raw, options, config, &host).await {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("import failed: {err}");
            return 1;
        }
    };

    if let ImportOutcome::AlreadyExists { .. } = outcome {
        println!("{outcome}");
        return 3;
    }

    if let Err(err) = store.snapshot().await.save(&parsed.world).await {
        eprintln!("failed to save world: {err}");
        return 1;
    }
    println!("{outcome}");
    0
}

fn handle_check_config(args: &[String]) -> i32 {
    let loaded = match args.get(2) {
        Some(path) => TranslatorConfig::load(Path::new(path)),
        None => TranslatorConfig::from_env(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config invalid: {err}");
            return 1;
        }
    };

    let source = args
        .get(2)
        .cloned()
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .unwrap_or_else(|| "built-in defaults".to_string());
    let aliases = config.aliases.items.len()
        + config.aliases.spells.len()
        + config.aliases.classes.len()
        + config.aliases.features.len();
    let known_terms = config.known_terms.languages.len()
        + config.known_terms.tools.len()
        + config.known_terms.armor.len()
        + config.known_terms.weapons.len();
    println!(
        "config ok: source='{source}', currencies={}, ignored_containers={}, aliases={aliases}, known_terms={known_terms}",
        config.currency.len(),
        config.ignored_containers.len(),
    );
    0
}
