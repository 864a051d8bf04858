//! Paper Aggregator - Entry Point
//!
//! `serve` runs the HTTP API; `search` runs one search and prints the result.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_aggregator::config::StoreBackend;
use paper_aggregator::server::ApiServer;
use paper_aggregator::{Config, SearchRequest, SearchService};

#[derive(Parser, Debug)]
#[command(name = "paper-aggregator")]
#[command(about = "Concurrent academic paper search across Semantic Scholar and CrossRef")]
#[command(version)]
struct Cli {
    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY", global = true)]
    api_key: Option<String>,

    /// Contact address for the CrossRef polite pool
    #[arg(long, env = "CROSSREF_MAILTO", global = true)]
    mailto: Option<String>,

    /// Document store backend (overrides STORE_BACKEND)
    #[arg(long, global = true)]
    store: Option<StoreBackend>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// HTTP server port
        #[arg(long, default_value = "8000", env = "PORT")]
        port: u16,
    },
    /// Run one search and print the result envelope as JSON
    Search {
        /// Free-text query
        query: String,

        /// Author hint
        #[arg(long)]
        author: Option<String>,

        /// Venue hint
        #[arg(long)]
        venue: Option<String>,

        /// Minimum publication year (inclusive)
        #[arg(long)]
        year_from: Option<i32>,

        /// Maximum publication year (inclusive)
        #[arg(long)]
        year_to: Option<i32>,

        /// Maximum number of results
        #[arg(long, default_value_t = paper_aggregator::config::limits::DEFAULT_LIMIT, allow_negative_numbers = true)]
        limit: i64,
    },
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // logs go to stderr so `search` output stays pipeable
    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if cli.api_key.is_some() {
        config.semantic_scholar_api_key = cli.api_key;
    }
    if cli.mailto.is_some() {
        config.crossref_mailto = cli.mailto;
    }
    if let Some(backend) = cli.store {
        config.store.backend = backend;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        store = ?config.store.backend,
        has_api_key = config.has_api_key(),
        "Starting paper aggregator"
    );

    let service = SearchService::from_config(&config)?;

    match cli.command {
        Command::Serve { port } => {
            tracing::info!(port, "Running in HTTP mode");
            ApiServer::new(service).run_http(port).await?;
        }
        Command::Search { query, author, venue, year_from, year_to, limit } => {
            let mut request = SearchRequest::new(query).with_years(year_from, year_to).with_limit(limit);
            request.author = author;
            request.venue = venue;

            let envelope = service.search(&request).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
    }

    Ok(())
}
