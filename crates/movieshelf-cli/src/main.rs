use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use movieshelf_core::{
    open_catalog, open_resolver, Card, DefectSummary, LoadOptions, Notice, PosterLookup,
    DEFAULT_DATA_FILE,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "movieshelf", version, about = "Load, validate and list bundled movie metadata")]
struct Cli {
    /// Asset directory containing the data file (bundled data when omitted)
    #[arg(long, env = "MOVIESHELF_ASSETS", global = true)]
    assets: Option<PathBuf>,

    /// Data file name inside the asset directory
    #[arg(long, default_value = DEFAULT_DATA_FILE, global = true)]
    data: String,

    /// Directory of poster images (bundled poster names when omitted)
    #[arg(long, env = "MOVIESHELF_POSTERS", global = true)]
    posters: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print one card per movie
    List {
        /// Print movies with their defect flags as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Print load counts and defect counts
    Summary,
    /// Resolve poster identifiers against the poster namespace
    Resolve {
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = LoadOptions {
        data_file: cli.data,
        assets_dir: cli.assets,
        posters_dir: cli.posters,
    };
    debug!("Options: {:?}", options);

    match cli.command.unwrap_or(Command::List { json: false }) {
        Command::List { json } => list(&options, json),
        Command::Summary => summary(&options),
        Command::Resolve { identifiers } => resolve(&options, &identifiers),
    }
}

fn list(options: &LoadOptions, json: bool) -> anyhow::Result<()> {
    let catalog = match open_catalog(options) {
        Ok(catalog) => catalog,
        Err(e) => anyhow::bail!(Notice::for_error(&e)),
    };
    let notice = Notice::for_movies(&catalog.movies);
    if notice.is_error() {
        anyhow::bail!(notice);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.movies)?);
        return Ok(());
    }

    let resolver = open_resolver(options).with_context(|| {
        format!(
            "Cannot open poster directory {}",
            options
                .posters_dir
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    })?;

    eprintln!("{}", notice);
    for (i, movie) in catalog.movies.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", Card::render(movie, &resolver));
    }
    Ok(())
}

fn summary(options: &LoadOptions) -> anyhow::Result<()> {
    let catalog = match open_catalog(options) {
        Ok(catalog) => catalog,
        Err(e) => anyhow::bail!(Notice::for_error(&e)),
    };
    let report = catalog.report;
    let defects = DefectSummary::scan(&catalog.movies);

    println!("{}", Notice::for_movies(&catalog.movies));
    println!(
        "Entries: {} total, {} loaded, {} skipped",
        report.total, report.loaded, report.skipped
    );
    println!(
        "Defects: {} title, {} year, {} genre, {} poster ({} total)",
        defects.title,
        defects.year,
        defects.genre,
        defects.poster,
        defects.total()
    );
    Ok(())
}

fn resolve(options: &LoadOptions, identifiers: &[String]) -> anyhow::Result<()> {
    let resolver = open_resolver(options).context("Cannot open poster directory")?;
    for identifier in identifiers {
        match resolver.resolve(identifier) {
            PosterLookup::Found { name, stage } => {
                println!("{} -> {} ({})", identifier, name, stage)
            }
            PosterLookup::NotFound => println!("{} -> not found", identifier),
        }
    }
    Ok(())
}
