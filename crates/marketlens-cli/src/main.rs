mod commands;
mod dashboard;
mod render;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use marketlens_core::TopMetric;
use marketlens_gateway::GatewayClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "marketlens")]
#[command(about = "Search the marketplace, sync products, and read catalog analytics")]
struct Cli {
    /// Backend base URL (overrides MARKETLENS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the external marketplace
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Sync products into the catalog by identifier
    Sync {
        /// One or more ASINs
        #[arg(required = true, num_args = 1..)]
        asins: Vec<String>,
    },
    /// Show catalog-wide analytics
    Overview,
    /// Show daily revenue, views, and conversions
    Trends {
        /// Window in days (7-365); the backend default when omitted
        #[arg(long, value_parser = clap::value_parser!(u32).range(7..=365))]
        days: Option<u32>,
    },
    /// Rank catalog products by a metric
    TopProducts {
        #[arg(long, default_value = "revenue")]
        metric: TopMetric,
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=50))]
        limit: u32,
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..=365))]
        days: u32,
    },
    /// List catalog products
    Products {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "0")]
        skip: u32,
        #[arg(long, default_value = "20", value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: u32,
    },
    /// Show one catalog product
    Product { asin: String },
    /// Show recorded prices for a catalog product
    PriceHistory { asin: String },
    /// Interactive dashboard on stdin
    Dashboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = marketlens_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    tracing::debug!(?config, "configuration loaded");

    let client = Arc::new(
        GatewayClient::from_config(&config).context("failed to build backend client")?,
    );
    let dash = commands::build_dashboard(&client, &config);

    match cli.command {
        Some(Commands::Search { query }) => commands::run_search(&dash, &query.join(" ")).await,
        Some(Commands::Sync { asins }) => commands::run_sync(&dash, &asins).await,
        Some(Commands::Overview) => commands::run_overview(&dash).await,
        Some(Commands::Trends { days }) => commands::run_trends(&client, &dash, days).await,
        Some(Commands::TopProducts {
            metric,
            limit,
            days,
        }) => commands::run_top_products(&client, metric, limit, days).await,
        Some(Commands::Products {
            category,
            skip,
            limit,
        }) => commands::run_products(&client, category.as_deref(), skip, limit).await,
        Some(Commands::Product { asin }) => commands::run_product(&client, &asin).await,
        Some(Commands::PriceHistory { asin }) => {
            commands::run_price_history(&client, &asin).await
        }
        Some(Commands::Dashboard) | None => dashboard::run_dashboard(Arc::new(dash)).await,
    }
}
