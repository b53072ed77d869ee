//! ipcache CLI
//!
//! Puts the read-through cache in front of a simulated remote IPv4 store and
//! runs lookups through it.

mod config;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ipcache_cache::ReadThroughCache;
use ipcache_core::constants::{ENV_DATA_FILE, ENV_EVICTION_INTERVAL_MS, ENV_LATENCY_MS};
use ipcache_core::KvStore;
use ipcache_store::MemoryStore;

use crate::config::Settings;

/// ipcache - read-through cache for a remote IPv4 key-value store
#[derive(Parser)]
#[command(name = "ipcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON object file used to seed the store ({"key": "ipv4", ...})
    #[arg(long, global = true, env = ENV_DATA_FILE)]
    data: Option<PathBuf>,

    /// Simulated store latency in milliseconds
    #[arg(long, global = true, env = ENV_LATENCY_MS, default_value = "100")]
    latency_ms: u64,

    /// Period between full cache flushes in milliseconds
    #[arg(long, global = true, env = ENV_EVICTION_INTERVAL_MS, default_value = "5000")]
    eviction_interval_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up keys through the cache
    Get {
        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
        /// Number of passes over the keys
        #[arg(short, long, default_value = "2")]
        repeat: usize,
    },

    /// Look up several keys at once (not cached)
    Mget {
        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// List every key in the store (not cached)
    Keys,

    /// Walk through a hit, a miss, and an eviction
    Demo {
        /// Key to look up
        #[arg(default_value = "10.0.0.1")]
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ipcache=debug,info"
    } else {
        "ipcache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings {
        data: cli.data,
        latency: Duration::from_millis(cli.latency_ms),
        eviction_interval: Duration::from_millis(cli.eviction_interval_ms),
    };

    let store = settings.build_store()?;
    let cache = ReadThroughCache::with_config(store.clone(), settings.cache_config())
        .context("Invalid cache configuration")?;

    let outcome = match cli.command {
        Commands::Get { keys, repeat } => cmd_get(&cache, &keys, repeat).await,
        Commands::Mget { keys } => cmd_mget(&cache, &keys).await,
        Commands::Keys => cmd_keys(&cache).await,
        Commands::Demo { key } => cmd_demo(&cache, &key).await,
    };

    cache.shutdown().await;
    outcome
}

type Cache = ReadThroughCache<MemoryStore>;

/// Look up keys, printing where each answer came from
async fn cmd_get(cache: &Cache, keys: &[String], repeat: usize) -> Result<()> {
    for pass in 1..=repeat {
        println!("{} {}", "Pass".cyan().bold(), pass);

        for key in keys {
            let misses_before = cache.stats().misses;
            let started = Instant::now();
            let result = cache.get(key).await;
            let elapsed = started.elapsed();
            let source = if cache.stats().misses > misses_before {
                "store".yellow()
            } else {
                "cache".green()
            };

            match result {
                Ok(ip) => println!("   {key} → {ip} ({source}, {elapsed:?})"),
                Err(e) => println!("   {key} → {} ({source}, {elapsed:?})", e.to_string().red()),
            }
        }
    }

    print_stats(cache);
    Ok(())
}

/// Bulk lookup, passed straight to the store
async fn cmd_mget(cache: &Cache, keys: &[String]) -> Result<()> {
    let values = cache.mget(keys).await.context("Bulk lookup failed")?;

    for (key, value) in keys.iter().zip(values) {
        match value {
            Some(ip) => println!("{key} → {ip}"),
            None => println!("{key} → {}", "(missing)".dimmed()),
        }
    }
    Ok(())
}

/// List all keys, passed straight to the store
async fn cmd_keys(cache: &Cache) -> Result<()> {
    let keys = cache.keys().await.context("Key listing failed")?;

    println!("{} {}", "Keys:".cyan().bold(), keys.len());
    for key in keys {
        println!("   {key}");
    }
    Ok(())
}

/// Fetch, hit, wait for a flush, fetch again
async fn cmd_demo(cache: &Cache, key: &str) -> Result<()> {
    let store = cache.remote();
    let interval = cache.stats().eviction_interval;

    let value = cache.get(key).await.context("First lookup failed")?;
    println!("{} {key} → {value}  (store calls: {})", "1. miss".yellow(), store.get_calls());

    let value = cache.get(key).await.context("Second lookup failed")?;
    println!("{} {key} → {value}  (store calls: {})", "2. hit ".green(), store.get_calls());

    println!("   waiting {interval:?} for the next flush...");
    tokio::time::sleep(interval + Duration::from_millis(50)).await;

    let value = cache.get(key).await.context("Third lookup failed")?;
    println!("{} {key} → {value}  (store calls: {})", "3. miss".yellow(), store.get_calls());

    print_stats(cache);
    Ok(())
}

fn print_stats(cache: &Cache) {
    let stats = cache.stats();
    println!("\n{}", "Cache stats:".cyan().bold());
    println!("   {} {}", "Hits:".dimmed(), stats.hits);
    println!("   {} {}", "Misses:".dimmed(), stats.misses);
    println!("   {} {}", "Store failures:".dimmed(), stats.remote_failures);
    println!("   {} {}", "Flushes:".dimmed(), stats.flushes);
    println!("   {} {:.1}%", "Hit ratio:".dimmed(), stats.hit_ratio() * 100.0);
}
