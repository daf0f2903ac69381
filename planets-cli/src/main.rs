//! Planets CLI
//!
//! Operator commands for the planets cache layer: run the startup warm-up,
//! inspect the seeded appearance index, and drop a cache namespace.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use planets_cache::RedisConfig;
use planets_core::constants::{APPEARANCES_NAMESPACE, PLANETS_NAMESPACE};
use planets_service::{Application, RunningApplication, ServiceConfig};

/// Planets - cache layer for the planets catalog
#[derive(Parser)]
#[command(name = "planets")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Redis URL (in-memory cache when unset)
    #[arg(long, global = true, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// SWAPI base URL
    #[arg(long, global = true, env = "SWAPI_BASE_URL")]
    swapi_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the startup sequence and seed the appearance index
    Warm {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a planet's seeded film appearance count
    Appearances {
        /// Exact planet name
        name: String,
    },

    /// Drop every cached entry of a namespace
    Evict {
        /// Namespace to clear ("planets" or "appearances")
        namespace: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "planets=debug,info"
    } else {
        "planets=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ServiceConfig::from_env().context("Invalid configuration")?;
    if let Some(url) = cli.redis_url.filter(|url| !url.trim().is_empty()) {
        config.redis = Some(RedisConfig::new(url));
    }
    if let Some(url) = cli.swapi_url {
        config.swapi.base_url = url;
    }
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Warm { json } => cmd_warm(config, json).await,
        Commands::Appearances { name } => cmd_appearances(config, &name).await,
        Commands::Evict { namespace } => cmd_evict(config, &namespace).await,
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

async fn start(config: ServiceConfig) -> Result<RunningApplication> {
    let app = Application::from_config(config)
        .await
        .context("Failed to build application")?;
    Ok(app.start().await)
}

/// Run the startup sequence
async fn cmd_warm(mut config: ServiceConfig, json: bool) -> Result<()> {
    println!("{} {}", "🌍 Warming cache from:".cyan().bold(), config.swapi.base_url);
    config.warmup_enabled = true;

    let pb = spinner("Fetching planets...")?;
    let running = start(config).await?;
    running.wait_for_hooks().await;
    pb.finish_and_clear();

    let Some(report) = running.warmer().last_report() else {
        println!("\n{}", "⚠️  Warm-up failed; the service started without seeded appearances.".yellow());
        println!("   Run with --verbose for the source error.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_complete() {
        println!("\n{}", "✅ Warm-up complete:".green().bold());
    } else {
        println!("\n{}", "⚠️  Warm-up finished with cache write failures:".yellow().bold());
    }
    println!("   {} {}", "Records fetched:".dimmed(), report.records_fetched);
    println!("   {} {}", "Entries written:".dimmed(), report.entries_written);
    if !report.is_complete() {
        println!("   {} {}", "Write failures:".red(), report.write_failures);
    }

    Ok(())
}

/// Look up a seeded appearance count
async fn cmd_appearances(mut config: ServiceConfig, name: &str) -> Result<()> {
    // Without a shared store there is nothing seeded to read, so warm in-process.
    config.warmup_enabled = config.redis.is_none();
    if config.warmup_enabled {
        println!("{}", "ℹ️  No REDIS_URL set, warming an in-process cache first".cyan());
    }

    let pb = spinner("Starting...")?;
    let running = start(config).await?;
    running.wait_for_hooks().await;
    pb.finish_and_clear();

    match running
        .warmer()
        .appearances(name)
        .await
        .context("Failed to read appearance index")?
    {
        Some(count) => println!("{} {} film(s)", format!("{name}:").green().bold(), count),
        None => println!("{} {}", "No appearance count seeded for".yellow(), name),
    }

    Ok(())
}

/// Drop a cache namespace
async fn cmd_evict(mut config: ServiceConfig, namespace: &str) -> Result<()> {
    if namespace != PLANETS_NAMESPACE && namespace != APPEARANCES_NAMESPACE {
        anyhow::bail!(
            "unknown namespace '{namespace}' (expected '{PLANETS_NAMESPACE}' or '{APPEARANCES_NAMESPACE}')"
        );
    }
    if config.redis.is_none() {
        println!("{}", "⚠️  No REDIS_URL set; nothing persistent to evict.".yellow());
        return Ok(());
    }
    config.warmup_enabled = false;

    let running = start(config).await?;
    let removed = running
        .cache()
        .evict_all(namespace)
        .await
        .with_context(|| format!("Failed to evict namespace '{namespace}'"))?;

    println!("{} {} entries from {}", "🧹 Removed".green().bold(), removed, namespace);
    Ok(())
}
