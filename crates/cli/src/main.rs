mod logging;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cmap_core::db::SqliteSink;
use cmap_core::legistar::LegistarClient;
use cmap_core::sink::JsonLinesSink;
use cmap_core::{Pipeline, PipelineConfig, Selection, Sink, Taxonomy};
use schemars::schema_for;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use time::Date;
use time::macros::format_description;

#[derive(Parser)]
#[command(name = "cmap")]
#[command(about = "CMAP Legistar ingest CLI", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by CMAP_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch matters and emit bills and vote events
    Scrape {
        /// Pipeline configuration (TOML); built-in CMAP defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Only matters modified after this date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "matter")]
        since: Option<String>,

        /// Only these matter ids (repeatable)
        #[arg(long)]
        matter: Vec<i64>,

        /// SQLite database to write to (overrides storage.db_path)
        #[arg(long, conflicts_with = "jsonl")]
        db: Option<String>,

        /// Write JSON lines instead of SQLite; "-" for stdout
        #[arg(long)]
        jsonl: Option<PathBuf>,
    },
    /// Export canonical JSON Schemas to the ./schemas directory
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
    /// Work with the action taxonomy
    Taxonomy {
        #[command(subcommand)]
        command: TaxonomyCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for the emitted types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum TaxonomyCommands {
    /// Write the built-in taxonomy as YAML, a starting point for taxonomy_path
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Commands::Scrape {
            config,
            since,
            matter,
            db,
            jsonl,
        } => scrape(config, since, matter, db, jsonl),
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
        Commands::Taxonomy { command } => match command {
            TaxonomyCommands::Export { out } => taxonomy_export(out),
        },
    }
}

fn scrape(
    config_path: Option<PathBuf>,
    since: Option<String>,
    matter_ids: Vec<i64>,
    db: Option<String>,
    jsonl: Option<PathBuf>,
) -> Result<()> {
    let config = PipelineConfig::load(config_path.as_deref())?;
    let taxonomy = config.taxonomy()?;

    let selection = match (since, matter_ids.is_empty()) {
        (Some(since), _) => {
            if Date::parse(&since, format_description!("[year]-[month]-[day]")).is_err() {
                bail!("--since expects YYYY-MM-DD, got {since:?}");
            }
            Selection::Since(since)
        }
        (None, false) => Selection::Ids(matter_ids),
        (None, true) => Selection::All,
    };

    let client = LegistarClient::new(&config.api)?;
    let mut sink: Box<dyn Sink> = match jsonl {
        Some(path) if path.as_os_str() == "-" => Box::new(JsonLinesSink::new(io::stdout().lock())),
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(JsonLinesSink::new(BufWriter::new(file)))
        }
        None => {
            let db_path = db.unwrap_or_else(|| config.storage.db_path.clone());
            Box::new(SqliteSink::open(&db_path)?)
        }
    };

    let pipeline = Pipeline {
        jurisdiction: config.jurisdiction.to_jurisdiction(),
        taxonomy: &taxonomy,
        vote_options: &config.votes,
        top_level: config.jurisdiction.top_level(),
    };
    let summary = pipeline.run(&client, sink.as_mut(), &selection)?;

    tracing::info!(
        bills = summary.bills,
        vote_events = summary.vote_events,
        "scrape finished"
    );
    Ok(())
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let bill_schema = schema_for!(cmap_core::schema::Bill);
    let bill_json = serde_json::to_string_pretty(&bill_schema)?;
    fs::write(out_dir.join("Bill.schema.json"), bill_json)?;

    let vote_schema = schema_for!(cmap_core::schema::VoteEvent);
    let vote_json = serde_json::to_string_pretty(&vote_schema)?;
    fs::write(out_dir.join("VoteEvent.schema.json"), vote_json)?;

    let jurisdiction_schema = schema_for!(cmap_core::schema::Jurisdiction);
    let jurisdiction_json = serde_json::to_string_pretty(&jurisdiction_schema)?;
    fs::write(out_dir.join("Jurisdiction.schema.json"), jurisdiction_json)?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}

fn taxonomy_export(out: Option<PathBuf>) -> Result<()> {
    let yaml = Taxonomy::builtin().to_yaml_string()?;
    match out {
        Some(path) => {
            fs::write(&path, yaml)?;
            println!("Exported taxonomy to {}", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}
