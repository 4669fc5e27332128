//! Spindrift main entry point
//!
//! This is the command-line interface for the Spindrift crawl scheduler.

use clap::Parser;
use spindrift::config::{load_config_with_hash, Config};
use spindrift::crawler::{build_crawler, CrawlPolicy, DomainFilterPolicy, Link};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Spindrift: a polite, policy-driven crawl scheduler
///
/// Spindrift walks the web one page at a time, ranking discovered links,
/// spacing out requests per authority, and tallying cross-domain backlinks
/// along the way.
#[derive(Parser, Debug)]
#[command(name = "spindrift")]
#[command(version = "0.1.0")]
#[command(about = "A polite, policy-driven crawl scheduler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("spindrift=info,warn"),
            1 => EnvFilter::new("spindrift=debug,info"),
            2 => EnvFilter::new("spindrift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Spindrift Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Politeness delay: {}ms", config.crawler.delay_ms);
    println!(
        "  Ordering: {}",
        if config.crawler.strict_order {
            "strict"
        } else {
            "interleaved"
        }
    );
    println!("  Method: {:?}", config.crawler.method);
    match config.crawler.max_pages {
        Some(max) => println!("  Page budget: {}", max),
        None => println!("  Page budget: unlimited"),
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nFetch:");
    println!("  Timeout: {}ms", config.fetch.timeout_ms);
    println!("  Max redirects: {}", config.fetch.max_redirects);
    if let Some(proxy) = &config.fetch.proxy {
        println!("  Proxy: {}", proxy);
    }
    if config.fetch.cached {
        println!("  Cache: enabled ({}s TTL)", config.fetch.cache_ttl_secs);
    } else {
        println!("  Cache: disabled");
    }

    if config.filter.allow.is_empty() {
        println!("\nAllowed Domains: all");
    } else {
        println!("\nAllowed Domains ({}):", config.filter.allow.len());
        for pattern in &config.filter.allow {
            println!("  - {}", pattern);
        }
    }

    println!("\nDenied Domains ({}):", config.filter.deny.len());
    for pattern in &config.filter.deny {
        println!("  - {}", pattern);
    }

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.crawler.seeds.len()
    );

    Ok(())
}

/// Policy for command-line crawls: applies the configured domain filters
/// and logs every page outcome.
struct CliPolicy {
    filter: DomainFilterPolicy,
}

impl CrawlPolicy for CliPolicy {
    fn follow(&self, link: &Link, referrer: &Link) -> bool {
        self.filter.follow(link, referrer)
    }

    fn visit(&mut self, link: &Link, _referrer: Option<&Link>, body: &str) {
        tracing::info!("Visited {} ({} bytes)", link.url, body.len());
    }

    fn fail(&mut self, link: &Link, referrer: Option<&Link>) {
        match referrer {
            Some(referrer) => tracing::warn!("Failed {} (found on {})", link.url, referrer.url),
            None => tracing::warn!("Failed seed {}", link.url),
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, politeness delay: {}ms, method: {:?}",
        config.crawler.seeds.len(),
        config.crawler.delay_ms,
        config.crawler.method
    );

    let policy = CliPolicy {
        filter: DomainFilterPolicy::new(config.filter.allow.clone(), config.filter.deny.clone()),
    };
    let mut crawler = build_crawler(&config, policy)?;

    crawler.run().await;

    println!("Crawl complete:");
    println!("  Pages visited:    {}", crawler.pages_visited());
    println!("  Pages failed:     {}", crawler.pages_failed());
    println!("  URLs discovered:  {}", crawler.registry().len());
    if !crawler.done() {
        println!("  Left in frontier: {}", crawler.frontier_len());
    }

    Ok(())
}
