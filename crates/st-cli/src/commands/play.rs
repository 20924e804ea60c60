use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use st_core::EngineConfig;

pub fn run(dir: &Path, config: EngineConfig, character: &str, n: usize) -> Result<(), String> {
    let mut engine = super::load_dir(dir, config)?;

    println!("  {} as {}", "Playing".bold(), character.bold());
    println!("  Pick an option by number, 'q' to quit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        let options = engine.options(character, n).map_err(|e| e.to_string())?;
        if options.is_empty() {
            println!("  {}", "No options left.".dimmed());
            break;
        }
        super::print_options(&engine, character, &options)?;

        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let Some(path) = input
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| options.get(i))
        else {
            println!("{}\n", format!("no option '{input}'").yellow());
            continue;
        };

        match engine.execute_action(character, path) {
            Ok(()) => println!(),
            Err(e) => println!("{}\n", e.to_string().yellow()),
        }
    }

    Ok(())
}
