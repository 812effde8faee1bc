use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lexis_core::loader::load_documents;
use lexis_core::{EngineConfig, IdfMode, Indexer, SearchHit, Searcher, StemmerKind};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "lexis")]
#[command(about = "Build an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long)]
    input: String,
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
    /// Use the Snowball English stemmer instead of the suffix table
    #[arg(long, default_value_t = false)]
    porter: bool,
    /// Query cache capacity (overrides the config file)
    #[arg(long, env = "LEXIS_CACHE_SIZE")]
    cache_size: Option<usize>,
    /// JSON engine config; flags above take precedence
    #[arg(long, env = "LEXIS_CONFIG")]
    config: Option<String>,
}

impl IndexArgs {
    fn config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(n) = self.cache_size { config.cache_capacity = n; }
        if self.smoothed_idf { config.idf = IdfMode::Smoothed; }
        if self.porter { config.stemmer = StemmerKind::Porter; }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more queries; wrap a phrase in double quotes for phrase search
    Search {
        #[command(flatten)]
        index: IndexArgs,
        /// Print results as JSON lines
        #[arg(long, default_value_t = false)]
        json: bool,
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Print index statistics
    Stats {
        #[command(flatten)]
        index: IndexArgs,
    },
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    total_hits: usize,
    results: &'a [SearchHit],
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { index, json, queries } => {
            let config = index.config()?;
            let searcher = Searcher::new(Arc::new(build_index(&index.input, &config)?), config.cache_capacity);
            for query in &queries {
                let hits = searcher.search_hits(query);
                if json {
                    let out = QueryOutput { query, total_hits: hits.len(), results: &hits };
                    println!("{}", serde_json::to_string(&out)?);
                } else {
                    print_hits(query, &hits);
                }
            }
            let stats = searcher.stats();
            tracing::info!(executed = stats.executed, cache_hits = stats.cache_hits, "done");
            Ok(())
        }
        Commands::Stats { index } => {
            let ix = build_index(&index.input, &index.config()?)?;
            println!("documents: {}", ix.num_docs());
            println!("terms:     {}", ix.num_terms());
            Ok(())
        }
    }
}

fn build_index(input: &str, config: &EngineConfig) -> Result<Indexer> {
    let docs = load_documents(input)?;
    let mut ix = Indexer::new(config);
    for doc in docs {
        ix.add_document(doc);
    }
    ix.finalize();
    tracing::info!(num_docs = ix.num_docs(), num_terms = ix.num_terms(), "index build complete");
    Ok(ix)
}

fn print_hits(query: &str, hits: &[SearchHit]) {
    println!("{query}  ({} hits)", hits.len());
    for hit in hits {
        let title = hit.document.field("title").unwrap_or("");
        match hit.score {
            Some(score) => println!("  {:>8.4}  {}  {}", score, hit.document.id(), title),
            None => println!("  {:>8}  {}  {}", "phrase", hit.document.id(), title),
        }
    }
}
