use std::path::Path;

use colored::Colorize;

use st_core::EngineConfig;

pub fn run(dir: &Path, config: EngineConfig, character: &str) -> Result<(), String> {
    let engine = super::load_dir(dir, config)?;
    let characteristics = engine
        .characteristics(character)
        .map_err(|e| e.to_string())?;

    println!("  {}", character.bold());
    if characteristics.is_empty() {
        println!("  {}", "No characteristics set yet.".dimmed());
        return Ok(());
    }

    println!("{}", super::characteristics_table(&characteristics));
    Ok(())
}
