mod confirm;
mod deck;
mod error;
mod gatherer;
mod imagemagick;
mod magiccards;
mod pages;
mod pipeline;
mod resolver;
mod scryfall;
mod store;

use std::error::Error;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{warn, Level};
use uuid::Uuid;

use crate::confirm::OverwritePolicy;
use crate::deck::Deck;
use crate::pipeline::Pipeline;
use crate::store::ImageStore;

/// Exact size every downloaded image is forced to before layout.
const CARD_SIZE: (u32, u32) = (312, 445);

#[derive(Parser)]
#[command(
    name = "deck_compiler",
    about = "Compile a deck list into printable proxy pages"
)]
struct Cli {
    /// Deck list, one "<count> <name>" per line.
    deck_file: PathBuf,

    /// Name prefix for the generated page images.
    #[arg(long)]
    prefix: Option<String>,

    /// Directory holding previously downloaded card images.
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Image format for the generated pages.
    #[arg(long, default_value = "png")]
    format: String,

    /// Merge the pages into one PDF at this path.
    #[arg(long)]
    merge: Option<PathBuf>,

    /// Keep the intermediate page images after merging.
    #[arg(long)]
    keep: bool,

    /// Overwrite existing files without asking.
    #[arg(long)]
    overwrite: bool,

    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, ValueEnum)]
enum LogLevel {
    /// Errors only.
    Critical,
    /// Progress and errors.
    Info,
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.log_level {
        LogLevel::Critical => Level::ERROR,
        LogLevel::Info => Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let deck = Deck::load(&cli.deck_file)?;
    println!(
        "Hi, {}! Compiling {} ({} cards, {} unique).",
        whoami::username(),
        cli.deck_file.display(),
        deck.total_cards(),
        deck.entries().len()
    );

    let cache_dir = cli
        .cache
        .unwrap_or_else(|| std::env::temp_dir().join("deck_compiler_cache"));
    let store = ImageStore::open(&cache_dir)?;

    let policy = if cli.overwrite {
        OverwritePolicy::Allow
    } else if std::io::stdin().is_terminal() {
        OverwritePolicy::Prompt
    } else {
        OverwritePolicy::Deny
    };

    // No timeout: a slow source blocks rather than fails
    let client = reqwest::blocking::Client::builder().timeout(None).build()?;
    let pipeline = Pipeline::new(
        &client,
        &store,
        resolver::default_chain(),
        &policy,
        CARD_SIZE,
    );
    let summary = pipeline.run(&deck)?;
    if !summary.failed.is_empty() {
        println!(
            "Could not fetch {} card(s): {}",
            summary.failed.len(),
            summary.failed.join(", ")
        );
    }

    let copies = pages::card_copies(&deck, &store);
    if copies.is_empty() {
        warn!("Nothing to lay out, skipping page generation");
        return Ok(());
    }

    let prefix = cli
        .prefix
        .unwrap_or_else(|| format!("page-{}-", Uuid::new_v4().simple()));
    println!("Writing {} page(s).", pages::page_count(copies.len()));
    let page_files = pages::compose(&copies, &prefix, &cli.format, CARD_SIZE, &policy)?;

    if let Some(target) = cli.merge {
        let merged = pages::merge(&page_files, &target, cli.keep, &policy)?;
        println!("Merged pages into {}.", merged.display());
    }

    println!(
        "Done. {} downloaded, {} already cached.",
        summary.downloaded, summary.cached
    );
    Ok(())
}
