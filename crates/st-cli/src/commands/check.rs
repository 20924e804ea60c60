use std::path::Path;

use st_core::EngineConfig;

pub fn run(dir: &Path, config: EngineConfig) -> Result<(), String> {
    let engine = super::load_dir(dir, config)?;

    let graphs = engine
        .characters()
        .iter()
        .filter(|c| c.graph().is_some())
        .count();
    let actions: usize = engine
        .characters()
        .iter()
        .filter_map(|c| c.graph())
        .map(|g| g.len())
        .sum();

    println!("  All checks passed for '{}'.", dir.display());
    println!(
        "  {} classes, {} characters, {} graphs, {} actions",
        engine.schema().len(),
        engine.characters().len(),
        graphs,
        actions
    );

    let classes: Vec<&str> = engine.schema().iter().map(|c| c.name.as_str()).collect();
    println!("  classes: {}", classes.join(", "));

    Ok(())
}
