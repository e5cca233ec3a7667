//! Command-line entry point over a mentem data directory.
//!
//! # Responsibility
//! - Build the library, hydrate it and run the legacy migration once.
//! - Offer a few inspection and capture commands for local use.

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use mentem_core::db::{open_db, KeyValueStore, SqliteKeyValueStore};
use mentem_core::{
    init_logging, init_logging_from, startup, AppConfig, FsStorage, Library, Memory,
    MigrationOutcome, Persister,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mentem", version, about, long_about = None)]
struct Cli {
    /// Directory that holds (or will hold) the `mentem/` data folder.
    #[arg(long, env = "MENTEM_DATA_ROOT")]
    data_root: PathBuf,

    /// Legacy key-value SQLite file to migrate from.
    #[arg(long, env = "MENTEM_LEGACY_DB")]
    legacy_db: Option<PathBuf>,

    #[arg(long, env = "MENTEM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Defaults to `<data-root>/mentem/logs`.
    #[arg(long, env = "MENTEM_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load everything and print per-collection counts.
    Status,
    /// Print the ids of one collection.
    List {
        #[arg(value_enum)]
        collection: CollectionArg,
    },
    /// Capture a note memory.
    Note {
        content: String,
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Create a tag unless one with the same name exists.
    Tag { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum CollectionArg {
    Memories,
    Cards,
    Tags,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mentem: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = AppConfig::new(&cli.data_root).map_err(|err| err.to_string())?;
    if let Some(path) = cli.legacy_db {
        config = config.with_legacy_db(path);
    }
    if let Some(level) = cli.log_level {
        config = config.with_log_level(level);
    }
    match cli.log_dir {
        Some(dir) => init_logging(&config.log_level, dir)?,
        None => init_logging_from(&config)?,
    }

    let storage = Arc::new(FsStorage::new(config.records_root()));
    let library = Library::new(Persister::on_current_runtime(storage));

    let legacy = match &config.legacy_db_path {
        Some(path) => Some(SqliteKeyValueStore::new(
            open_db(path).map_err(|err| err.to_string())?,
        )),
        None => None,
    };
    let report = startup(&library, legacy.as_ref().map(|kv| kv as &dyn KeyValueStore)).await;
    info!(
        "event=cli_start module=cli status=ok memories={} cards={} tags={}",
        library.memories.len(),
        library.cards.len(),
        library.tags.len()
    );

    match cli.command {
        Command::Status => {
            println!("memories={}", library.memories.len());
            println!("cards={}", library.cards.len());
            println!("tags={}", library.tags.len());
            println!("skipped={}", report.hydration.skipped);
            match report.migration {
                Some(MigrationOutcome::Attempted(migration)) => println!(
                    "migrated memories={} cards={} tags={} failures={}",
                    migration.memories, migration.cards, migration.tags, migration.failures
                ),
                Some(MigrationOutcome::AlreadyMigrated) => println!("migration=done"),
                Some(MigrationOutcome::FlagUnavailable) => println!("migration=unavailable"),
                None => {}
            }
        }
        Command::List { collection } => {
            let ids: Vec<String> = match collection {
                CollectionArg::Memories => {
                    library.memories.list().into_iter().map(|m| m.id).collect()
                }
                CollectionArg::Cards => library.cards.list().into_iter().map(|c| c.id).collect(),
                CollectionArg::Tags => library.tags.list().into_iter().map(|t| t.id).collect(),
            };
            for id in ids {
                println!("{id}");
            }
        }
        Command::Note { content, title } => {
            let mut memory = Memory::note(content);
            memory.title = title.filter(|value| !value.trim().is_empty());
            let id = memory.id.clone();
            library.memories.add(memory);
            println!("{id}");
        }
        Command::Tag { name } => {
            let tag = library
                .tags
                .ensure_tag(&name)
                .ok_or_else(|| "tag name cannot be blank".to_string())?;
            println!("{} {}", tag.id, tag.color);
        }
    }

    library.settle().await;
    Ok(())
}
