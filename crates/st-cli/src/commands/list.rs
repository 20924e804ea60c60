use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use st_core::EngineConfig;

pub fn run(dir: &Path, config: EngineConfig) -> Result<(), String> {
    let engine = super::load_dir(dir, config)?;
    let names = engine.character_names().map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Characteristics", "Actions"]);

    for name in &names {
        let character = engine.characters().get(name).map_err(|e| e.to_string())?;
        let actions = match character.graph() {
            Some(graph) => graph.len().to_string(),
            None => "—".to_string(),
        };
        table.add_row(vec![
            name.clone(),
            character.characteristics.len().to_string(),
            actions,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} characters", names.len());

    Ok(())
}
