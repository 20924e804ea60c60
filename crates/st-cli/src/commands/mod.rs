pub mod check;
pub mod exec;
pub mod list;
pub mod options;
pub mod play;
pub mod show;

use std::fs;
use std::path::{Path, PathBuf};

use comfy_table::{ContentArrangement, Table};
use serde::de::DeserializeOwned;

use st_core::{ActionId, ActionRecord, Characteristic, Engine, EngineConfig};

/// Load `schema.json`, `characters.json` and every `trees/<Character>.json`
/// from a data directory into a ready engine.
fn load_dir(dir: &Path, config: EngineConfig) -> Result<Engine, String> {
    let mut engine = Engine::new(config);

    let schema = read_json(&dir.join("schema.json"))?;
    engine
        .load_schema(schema)
        .map_err(|e| format!("schema.json: {e}"))?;

    let characters = read_json(&dir.join("characters.json"))?;
    engine
        .load_characters(characters)
        .map_err(|e| format!("characters.json: {e}"))?;

    let mut graphs = Vec::new();
    for path in tree_files(&dir.join("trees"))? {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        tracing::debug!(character = name, path = %path.display(), "reading action tree");
        let records: Vec<ActionRecord> = read_json(&path)?;
        graphs.push((name.to_string(), records));
    }
    engine
        .load_graphs(graphs)
        .map_err(|e| format!("trees: {e}"))?;

    Ok(engine)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

/// Tree documents sorted by file name. A missing `trees/` directory means no graphs.
fn tree_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries =
        fs::read_dir(dir).map_err(|e| format!("failed to read {}: {e}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn characteristics_table(characteristics: &[Characteristic]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Class", "Type", "Value", "Range"]);

    for c in characteristics {
        let range = if c.is_boolean {
            "flag".to_string()
        } else {
            format!("{}..={}", c.min, c.max)
        };
        table.add_row(vec![
            c.class.clone(),
            c.subtype.clone(),
            c.value.to_string(),
            range,
        ]);
    }
    table
}

/// Print numbered options with their action names.
fn print_options(engine: &Engine, character: &str, options: &[Vec<ActionId>]) -> Result<(), String> {
    let names = engine
        .option_names(character, options)
        .map_err(|e| e.to_string())?;
    for (i, (path, names)) in options.iter().zip(&names).enumerate() {
        println!("{}", format_option(i, names, path));
    }
    Ok(())
}

/// One option per line: `  1. greet > chat > joke  [1 2 4]`.
fn format_option(index: usize, names: &[String], path: &[ActionId]) -> String {
    let uids: Vec<String> = path.iter().map(ToString::to_string).collect();
    format!("  {}. {}  [{}]", index + 1, names.join(" > "), uids.join(" "))
}
