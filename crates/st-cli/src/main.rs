//! CLI frontend for the story tree engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use st_core::{ClassDedup, DuplicatePolicy, EngineConfig};

#[derive(Parser)]
#[command(
    name = "st",
    about = "Story tree: character state and branching dialogue options",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log load and traversal details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// How class tags limit repeated options
    #[arg(long, global = true, value_enum, default_value = "skip-consumed")]
    class_dedup: DedupArg,

    /// Fail when the character document repeats a name
    #[arg(long, global = true)]
    strict_characters: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DedupArg {
    SkipConsumed,
    RecordOnly,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the data directory and report what was found
    Check {
        /// Data directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// List characters in registration order
    List {
        /// Data directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show a character's characteristics
    Show {
        /// Character name
        character: String,

        /// Data directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// List the options currently open to a character
    Options {
        /// Character name
        character: String,

        /// Maximum number of options
        #[arg(short, long, default_value = "5")]
        n: usize,

        /// Data directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Execute a path of actions and show the resulting state
    Exec {
        /// Character whose graph holds the path
        character: String,

        /// Action uids, root first
        #[arg(required = true)]
        uids: Vec<i64>,

        /// Data directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Pick options interactively
    Play {
        /// Character name
        character: String,

        /// Options offered per turn
        #[arg(short, long, default_value = "5")]
        n: usize,

        /// Data directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "st_core=debug,st_cli=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let dedup = match cli.class_dedup {
        DedupArg::SkipConsumed => ClassDedup::SkipConsumed,
        DedupArg::RecordOnly => ClassDedup::RecordOnly,
    };
    let duplicates = if cli.strict_characters {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::Ignore
    };
    let config = EngineConfig::default()
        .with_class_dedup(dedup)
        .with_duplicate_characters(duplicates);

    let result = match cli.command {
        Commands::Check { dir } => commands::check::run(&dir, config),
        Commands::List { dir } => commands::list::run(&dir, config),
        Commands::Show { character, dir } => commands::show::run(&dir, config, &character),
        Commands::Options { character, n, dir } => {
            commands::options::run(&dir, config, &character, n)
        }
        Commands::Exec {
            character,
            uids,
            dir,
        } => commands::exec::run(&dir, config, &character, &uids),
        Commands::Play { character, n, dir } => commands::play::run(&dir, config, &character, n),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
