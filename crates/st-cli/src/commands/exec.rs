use std::path::Path;

use colored::Colorize;

use st_core::{ActionId, EngineConfig};

pub fn run(dir: &Path, config: EngineConfig, character: &str, uids: &[i64]) -> Result<(), String> {
    let mut engine = super::load_dir(dir, config)?;
    let path: Vec<ActionId> = uids.iter().copied().map(ActionId).collect();

    engine
        .execute_action(character, &path)
        .map_err(|e| e.to_string())?;

    let names = engine
        .option_names(character, std::slice::from_ref(&path))
        .map_err(|e| e.to_string())?;
    let executed = names.first().map(|n| n.join(" > ")).unwrap_or_default();
    println!("  {} {executed}", "Executed".bold());

    let characteristics = engine
        .characteristics(character)
        .map_err(|e| e.to_string())?;
    if !characteristics.is_empty() {
        println!("{}", super::characteristics_table(&characteristics));
    }

    Ok(())
}
