// Herbal recommender command line
//
// Usage:
//   herbal clean                      # data/raw_herbs.csv -> data/raw_herbs_clean.csv
//   herbal build                      # cleaned sheet -> herbs/symptoms/effects CSVs
//   herbal recommend joint pain       # ranked recommendations for a symptom
//   herbal recommend headache --json  # same, as JSON

use anyhow::Context;
use clap::{Parser, Subcommand};
use herbal_recommender::{
    ingest, HerbData, HerbStore, JsonFormatter, MarkdownFormatter, RecommenderConfig,
    Recommender,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "herbal", about = "Symptom-driven herbal remedy recommendations")]
struct Cli {
    /// Data directory holding the CSV files
    #[arg(long, global = true, env = "HERBAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON config file (data_dir, default_limit)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the cells of the raw sheet and write the cleaned sheet
    Clean {
        #[arg(long)]
        raw: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Build herbs.csv, symptoms.csv and herb_symptom_effects.csv
    Build {
        /// Cleaned sheet (defaults to <data-dir>/raw_herbs_clean.csv)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Treat the input as a raw sheet and clean it first
        #[arg(long)]
        from_raw: bool,
    },

    /// Recommend herbs for a symptom
    Recommend {
        /// Symptom name (case-insensitive, may contain spaces)
        #[arg(required = true, num_args = 1..)]
        symptom: Vec<String>,

        /// Number of therapeutic options
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        limit: Option<u16>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Query a DuckDB database instead of the CSV files
        /// (requires the duckdb_store feature)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Load the CSV files into a DuckDB database
    #[cfg(feature = "duckdb_store")]
    LoadDb {
        db: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herbal_recommender=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RecommenderConfig::load(path)?,
        None => RecommenderConfig::from_env(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let paths = config.paths();

    match cli.command {
        Command::Clean { raw, out } => {
            let raw = raw.unwrap_or_else(|| paths.raw());
            let out = out.unwrap_or_else(|| paths.clean());
            let records = ingest::clean_raw_csv(&raw, &out)?;
            println!("Cleaned dataset created: {} ({} herbs)", out.display(), records.len());
        }

        Command::Build { input, from_raw } => {
            let dataset = if from_raw {
                ingest::build_from_raw(&input.unwrap_or_else(|| paths.raw()), &paths)?
            } else {
                ingest::build_from_clean(&input.unwrap_or_else(|| paths.clean()), &paths)?
            };
            println!(
                "Built herbs.csv ({}), symptoms.csv ({}), herb_symptom_effects.csv ({}) in {}",
                dataset.herbs.len(),
                dataset.symptoms.len(),
                dataset.effects.len(),
                paths.data_dir.display()
            );
        }

        Command::Recommend { symptom, limit, json, db } => {
            let limit = limit.map(usize::from).unwrap_or(config.default_limit);
            let symptom = symptom.join(" ");

            if let Some(db) = db {
                return recommend_from_db(&db, limit, &symptom, json);
            }

            let (data, _report) = HerbData::load(&paths)
                .with_context(|| format!("Failed to load dataset from {:?}", paths.data_dir))?;
            recommend(&data, limit, &symptom, json)?;
        }

        #[cfg(feature = "duckdb_store")]
        Command::LoadDb { db } => {
            let mut store = herbal_recommender::DuckDbStore::open(&db)?;
            let report = store.load_csvs(&paths)?;
            println!(
                "Herbal database created: {} ({} herbs, {} symptoms, {} effects)",
                db.display(),
                report.herbs_loaded,
                report.symptoms_loaded,
                report.effects_loaded
            );
        }
    }

    Ok(())
}

fn recommend<S: HerbStore>(store: S, limit: usize, symptom: &str, json: bool) -> anyhow::Result<()> {
    let recommendation = Recommender::new(store, limit).recommend(symptom)?;

    if json {
        println!("{}", JsonFormatter::format(&recommendation)?);
    } else {
        print!("{}", MarkdownFormatter::format(&recommendation));
    }

    Ok(())
}

#[cfg(feature = "duckdb_store")]
fn recommend_from_db(db: &Path, limit: usize, symptom: &str, json: bool) -> anyhow::Result<()> {
    let store = herbal_recommender::DuckDbStore::open(db)
        .with_context(|| format!("Failed to open DuckDB database {:?}", db))?;
    recommend(&store, limit, symptom, json)
}

#[cfg(not(feature = "duckdb_store"))]
fn recommend_from_db(_db: &Path, _limit: usize, _symptom: &str, _json: bool) -> anyhow::Result<()> {
    anyhow::bail!("--db needs a build with the duckdb_store feature")
}
