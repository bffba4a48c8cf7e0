//! Sitemap-Ripple main entry point
//!
//! This is the command-line interface for the Sitemap-Ripple site mapper.

use anyhow::Context;
use clap::Parser;
use sitemap_ripple::cleanup::purge_output_dir;
use sitemap_ripple::config::{load_config_with_hash, validate, Config};
use sitemap_ripple::service::{CrawlRequest, SitemapService};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Sitemap-Ripple: a bounded-depth site crawler
///
/// Sitemap-Ripple walks a site breadth-first from the given URL, keeps every
/// same-domain HTML page that answers a HEAD request, and writes the result as
/// a Sitemap (or a zipped Sitemap Index for very large sites).
#[derive(Parser, Debug)]
#[command(name = "sitemap-ripple")]
#[command(version)]
#[command(about = "A bounded-depth site crawler and Sitemap generator", long_about = None)]
struct Cli {
    /// Seed URL of the site to map
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the crawl depth from the configuration
    #[arg(short, long)]
    depth: Option<u32>,

    /// Override the output directory from the configuration
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Remove leftover .xml and .zip files from the output directory first
    #[arg(long)]
    purge: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    if cli.purge {
        purge_output_dir(&config.output.directory).with_context(|| {
            format!("Failed to purge {}", config.output.directory.display())
        })?;
    }

    let service = SitemapService::new(config);
    let response = service.generate(CrawlRequest { url: cli.url }).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_ripple=info,warn"),
            1 => EnvFilter::new("sitemap_ripple=debug,info"),
            2 => EnvFilter::new("sitemap_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // stdout carries the JSON response
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
