use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stargaze_core::{RepositorySearchEngine, SearchConfig, SearchOptions};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

mod load;

#[derive(Parser)]
#[command(name = "stargaze")]
#[command(about = "Rank starred GitHub repositories by keyword", long_about = None)]
struct Cli {
    /// Repository records: a .json/.jsonl file or a directory of them
    #[arg(long)]
    input: PathBuf,
    /// JSON file with ranking parameters; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Cap on tokens read from each readme
    #[arg(long)]
    max_readme_tokens: Option<usize>,
    /// Cap on query tokens considered per search
    #[arg(long)]
    max_keywords: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the best matching repositories as JSON
    Search {
        /// Keywords; each may contain several words
        #[arg(required = true)]
        keywords: Vec<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print index statistics as JSON
    Stats,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let mut engine = RepositorySearchEngine::with_config(config)?;
    let repos = load::load_repositories(&cli.input)?;
    let loaded = repos.len();
    for repo in repos {
        engine.add(repo);
    }
    engine.consolidate();
    tracing::info!(loaded, indexed = engine.len(), "index ready");

    let out = match cli.command {
        Commands::Search { keywords, limit } => {
            let hits = engine.search(&keywords, SearchOptions::with_limit(limit));
            tracing::info!(hits = hits.len(), "search complete");
            serde_json::to_string_pretty(&hits)?
        }
        Commands::Stats => serde_json::to_string_pretty(&engine.stats())?,
    };
    println!("{out}");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SearchConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SearchConfig::default(),
    };
    if let Some(max) = cli.max_readme_tokens {
        config.max_readme_tokens = Some(max);
    }
    if let Some(max) = cli.max_keywords {
        config.max_keywords = max;
    }
    Ok(config)
}
