//! CLI administration tool for mirror-collector.
//!
//! Runs collections in the foreground, resolves single URLs and inspects the
//! stored records without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Run a full collection over the built-in merchants
//! cargo run --bin mirror-admin -- collect all --limit 20
//!
//! # Run a collection over a merchants file
//! cargo run --bin mirror-admin -- collect batch --config merchants.json
//!
//! # Resolve a single URL in the browser
//! cargo run --bin mirror-admin -- resolve https://bit.ly/abc --click "Enter site"
//!
//! # Inspect stored records
//! cargo run --bin mirror-admin -- mirrors --merchant stake --limit 20
//! cargo run --bin mirror-admin -- stats
//!
//! # Check database connection
//! cargo run --bin mirror-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `mirror_collector::config`. A search credential is
//! only needed by `collect`.

use mirror_collector::application::services::{
    DEFAULT_ALL_LIMIT, DEFAULT_BATCH_LIMIT, MirrorService,
};
use mirror_collector::config::{self, Config};
use mirror_collector::domain::entities::{MirrorFilter, ResolveStrategy, RunSummary, default_merchants};
use mirror_collector::domain::providers::UrlResolver;
use mirror_collector::infrastructure::persistence::SqliteMirrorRepository;
use mirror_collector::server::{build_collector, build_resolvers, connect_database};
use mirror_collector::utils::merchants_loader::load_merchants;
use mirror_collector::utils::url::parse_http_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// CLI tool for managing mirror-collector.
#[derive(Parser)]
#[command(name = "mirror-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Run a collection in the foreground
    Collect {
        #[command(subcommand)]
        action: CollectAction,
    },

    /// Resolve one URL in the headless browser
    Resolve {
        url: String,

        /// Navigation budget in seconds
        #[arg(short, long)]
        wait: Option<u64>,

        /// Button text to probe (repeatable)
        #[arg(short, long = "click")]
        click: Vec<String>,
    },

    /// List stored mirror records
    Mirrors {
        #[arg(short, long)]
        merchant: Option<String>,

        #[arg(short, long)]
        country: Option<String>,

        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum CollectAction {
    /// Collect for every built-in merchant
    All {
        /// Per-merchant budget
        #[arg(short, long, default_value_t = DEFAULT_ALL_LIMIT)]
        limit: usize,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Collect for the merchants listed in a JSON file
    Batch {
        /// JSON array of {merchant, country?, keywords?, brand_pattern?}
        #[arg(short, long)]
        config: PathBuf,

        /// Per-merchant budget
        #[arg(short, long, default_value_t = DEFAULT_BATCH_LIMIT)]
        limit: usize,

        /// Record search hits without following redirects
        #[arg(long, conflicts_with = "interactive")]
        no_follow_redirects: bool,

        /// Resolve hits in a headless browser and click through interstitials
        #[arg(short, long)]
        interactive: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Collect { action } => handle_collect(action, &config).await?,
        Commands::Resolve { url, wait, click } => resolve(&config, &url, wait, click).await?,
        Commands::Mirrors {
            merchant,
            country,
            limit,
        } => {
            let pool = connect_database(&config).await?;
            list_mirrors(&pool, merchant, country, limit).await?;
        }
        Commands::Stats => {
            let pool = connect_database(&config).await?;
            handle_stats(&pool).await?;
        }
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

/// Dispatches foreground collection commands.
async fn handle_collect(action: CollectAction, config: &Config) -> Result<()> {
    let pool = Arc::new(connect_database(config).await?);
    let collector = build_collector(config, pool)?;

    let summary = match action {
        CollectAction::All { limit, yes } => {
            let merchants = default_merchants();
            println!("{}", "🔎 Full collection".bright_blue().bold());
            println!();
            println!(
                "  Merchants: {}",
                merchants.len().to_string().bright_white().bold()
            );
            println!("  Limit:     {}", limit.to_string().bright_white().bold());
            println!(
                "  Provider:  {}",
                config.search_backend.to_string().cyan()
            );
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Run searches for every merchant?")
                    .default(true)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            collector.collect_all(limit).await
        }
        CollectAction::Batch {
            config: path,
            limit,
            no_follow_redirects,
            interactive,
        } => {
            let merchants = load_merchants(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            println!("{}", "🔎 Batch collection".bright_blue().bold());
            println!(
                "  {} merchants from {}",
                merchants.len().to_string().bright_white().bold(),
                path.display().to_string().cyan()
            );
            println!();

            let strategy = ResolveStrategy::for_run(!no_follow_redirects, interactive);
            collector.collect_batch(merchants, limit, strategy).await
        }
    };

    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "✅ Collection finished".green().bold());
    println!();
    println!(
        "  Created:   {}",
        summary.created.to_string().bright_green().bold()
    );
    println!(
        "  Updated:   {}",
        summary.updated.to_string().bright_yellow().bold()
    );
    println!("  Merchants: {}", summary.merchants_count);
    println!("  Limit:     {}", summary.limit);
    if let Some(follow) = summary.follow_redirects {
        println!("  Redirects: {}", if follow { "followed" } else { "not followed" });
    }
    if let Some(strategy) = summary.strategy {
        println!("  Resolver:  {:?}", strategy);
    }
    println!();
}

/// Resolves a URL in the browser and prints the redirect chain.
async fn resolve(config: &Config, url: &str, wait: Option<u64>, click: Vec<String>) -> Result<()> {
    let url = parse_http_url(url)?.to_string();
    let options = config.resolve_options().merged(wait, Some(click));
    let resolvers = build_resolvers(config)?;

    println!(
        "{} {}",
        "🌐 Resolving".bright_blue().bold(),
        url.cyan()
    );
    println!();

    let resolution = resolvers.browser.resolve(&url, &options).await;

    for (i, hop) in resolution.redirect_chain.iter().enumerate() {
        println!("  {:>2}. {}", (i + 1).to_string().bright_black(), hop);
    }
    println!();
    println!("  Final:      {}", resolution.final_url.bright_white().bold());
    println!("  Domain:     {}", resolution.final_domain.cyan());
    println!(
        "  Redirector: {}",
        if resolution.is_redirector { "yes".yellow() } else { "no".normal() }
    );
    println!(
        "  Clicked:    {}",
        if resolution.cta_clicked { "yes".yellow() } else { "no".normal() }
    );

    match &resolution.error {
        Some(error) if !resolution.ok => {
            println!();
            println!("{} {}", "⚠️  Resolution failed:".red().bold(), error);
        }
        Some(error) => {
            println!();
            println!("{} {}", "⚠️  Partial load:".yellow(), error);
        }
        None => {}
    }
    println!();

    Ok(())
}

/// Lists stored records, most recently seen first.
///
/// # Output Format
///
/// ```text
/// 📋 Mirrors
///
///   Merchant     Country  Source domain          Final domain           Flags    Last seen
///   ─────────────────────────────────────────────────────────────────────────────────────────
///   stake        in       bit.ly                 stake.com              R M      2025-01-15 10:30
/// ```
async fn list_mirrors(
    pool: &SqlitePool,
    merchant: Option<String>,
    country: Option<String>,
    limit: i64,
) -> Result<()> {
    println!("{}", "📋 Mirrors".bright_blue().bold());
    println!();

    let service = mirror_service(pool);
    let filter = MirrorFilter::new(limit.clamp(1, 1000))
        .with_merchant(merchant)
        .with_country(country);

    let total = service
        .count(filter.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mirrors: {}", e))?;
    let mirrors = service
        .list(filter)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list mirrors: {}", e))?;

    if mirrors.is_empty() {
        println!("{}", "  No mirrors found".yellow());
        println!();
        println!(
            "  Collect some with: {} mirror-admin collect all",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<12} {:<8} {:<24} {:<24} {:<6} {}",
        "Merchant".bright_white().bold(),
        "Country".bright_white().bold(),
        "Source domain".bright_white().bold(),
        "Final domain".bright_white().bold(),
        "Flags".bright_white().bold(),
        "Last seen".bright_white().bold()
    );
    println!("  {}", "─".repeat(95).bright_black());

    for mirror in &mirrors {
        let flags = format!(
            "{}{}{}",
            if mirror.is_redirector { "R" } else { "-" },
            if mirror.is_mirror { "M" } else { "-" },
            if mirror.cta_found { "C" } else { "-" }
        );

        println!(
            "  {:<12} {:<8} {:<24} {:<24} {:<6} {}",
            mirror.merchant.cyan(),
            mirror.country,
            mirror.source_domain,
            mirror.final_domain.bright_white(),
            flags.yellow(),
            mirror
                .last_seen_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        mirrors.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!("  {}", "R = redirector, M = mirror, C = consent clicked".bright_black());
    println!();

    Ok(())
}

/// Displays record totals and per-merchant counts.
async fn handle_stats(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let stats = mirror_service(pool)
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load stats: {}", e))?;

    println!(
        "  Records:     {}",
        stats.total.to_string().bright_green().bold()
    );
    println!(
        "  Mirrors:     {}",
        stats.mirrors.to_string().bright_green().bold()
    );
    println!(
        "  Redirectors: {}",
        stats.redirectors.to_string().bright_green().bold()
    );

    if !stats.per_merchant.is_empty() {
        println!();
        println!("{}", "  Per merchant:".bright_white());
        for row in &stats.per_merchant {
            println!("    {:<16} {}", row.merchant.cyan(), row.count);
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let pool = connect_database(config).await?;
            if !mirror_service(&pool).health_check().await {
                anyhow::bail!("Database query failed");
            }

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}

fn mirror_service(pool: &SqlitePool) -> MirrorService<SqliteMirrorRepository> {
    MirrorService::new(Arc::new(SqliteMirrorRepository::new(Arc::new(pool.clone()))))
}
