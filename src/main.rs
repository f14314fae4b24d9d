use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use price_scout::{AppConfig, SearchEngine, SearchResult};

#[derive(Parser)]
#[command(name = "price-scout", version, about = "Search product prices across online stores")]
struct Cli {
    /// Explicit configuration file instead of config/ and PRICE_SCOUT_* layering
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search every active site and print the cheapest listings
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,

        /// Number of listings to print (defaults to search.default_top)
        #[arg(short, long)]
        top: Option<usize>,

        /// Print the listings as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// List configured sites
    Sites,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so `--json` output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("price_scout=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::from_env(),
    }
    .context("Failed to load configuration")?;

    let engine = SearchEngine::from_config(&config).context("Failed to build search engine")?;

    match cli.command {
        Command::Search { term, top, json } => {
            let term = term.join(" ");
            let n = top.unwrap_or(config.search.default_top);

            info!("Starting price search for '{}'", term);
            engine.search(&term).await;
            let best = engine.top(n).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&best.listings)?);
            } else {
                print_listings(&best);
            }
        }
        Command::Sites => {
            for site in engine.sites().await {
                let state = if site.active { "active" } else { "inactive" };
                println!("{:<20} {:<9} {}", site.identifier, state, site.search_url);
            }
        }
    }

    Ok(())
}

fn print_listings(result: &SearchResult) {
    if result.is_empty() {
        println!("No listings found for '{}'", result.term);
    }

    for (rank, listing) in result.listings.iter().enumerate() {
        println!("{:>2}. {} | {}", rank + 1, listing.price_display, listing.source_site);
        println!("    {}", listing.name);
        if let Some(link) = &listing.link {
            println!("    {}", link);
        }
    }

    for report in &result.sites {
        println!("[{}] {} listing(s), {:?}", report.site, report.listings, report.outcome);
    }
}
