use std::path::Path;

use colored::Colorize;

use st_core::EngineConfig;

pub fn run(dir: &Path, config: EngineConfig, character: &str, n: usize) -> Result<(), String> {
    let mut engine = super::load_dir(dir, config)?;
    let options = engine.options(character, n).map_err(|e| e.to_string())?;

    if options.is_empty() {
        println!("  {}", "No options available.".dimmed());
        return Ok(());
    }

    super::print_options(&engine, character, &options)
}
