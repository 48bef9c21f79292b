//! vncrawl main entry point
//!
//! Command-line interface for crawling configured news sites, merging
//! per-site outputs into one corpus, and canonicalizing date fields.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;
use vncrawl::config::load_config_with_hash;
use vncrawl::crawler::{CrawlEngine, Fetcher, SelectorStrategy};
use vncrawl::images::ImagePipeline;

/// vncrawl: a news-article crawler
#[derive(Parser, Debug)]
#[command(name = "vncrawl")]
#[command(version)]
#[command(about = "Crawl news sites into a structured article corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl every configured site, writing one data.json per site
    Crawl {
        /// Path to TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Merge per-site outputs into one corpus with provenance tags
    Merge {
        /// Directory holding the per-site output subdirectories
        #[arg(long)]
        crawl_dir: PathBuf,

        /// Path of the merged corpus document
        #[arg(long)]
        output: PathBuf,
    },

    /// Rewrite date fields to ISO-8601 with a Z suffix
    ConvertDates {
        /// A single data.json to rewrite in place
        #[arg(long, conflicts_with = "crawl_dir")]
        path: Option<PathBuf>,

        /// Rewrite every <site>/data.json under this directory
        #[arg(long)]
        crawl_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Crawl { config } => handle_crawl(&config).await,
        Commands::Merge { crawl_dir, output } => handle_merge(&crawl_dir, &output),
        Commands::ConvertDates { path, crawl_dir } => handle_convert_dates(path, crawl_dir),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vncrawl=info,warn"),
            1 => EnvFilter::new("vncrawl=debug,info"),
            2 => EnvFilter::new("vncrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Handles the crawl subcommand: one engine run per configured site
async fn handle_crawl(config_path: &Path) -> anyhow::Result<()> {
    let (config, config_hash) = load_config_with_hash(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let output_root = Path::new(&config.output.directory);

    for site in &config.site {
        tracing::info!("Starting site '{}'", site.name);

        // Output and image directories must exist before any write
        let site_dir = output_root.join(&site.name);
        std::fs::create_dir_all(&site_dir)
            .with_context(|| format!("creating {}", site_dir.display()))?;

        let strategy = SelectorStrategy::from_site(site)?;
        let fetcher = Fetcher::connect(&config.crawler).await?;
        let images = ImagePipeline::new(site_dir.join("image"), &config.crawler.user_agent)?;

        let seeds: Vec<Url> = site
            .seeds
            .iter()
            .map(|seed| Url::parse(seed))
            .collect::<Result<_, _>>()
            .context("seed URL validated at load time no longer parses")?;

        let mut engine = CrawlEngine::new(&config.crawler, strategy, fetcher, images);
        engine.run(&seeds).await;

        tracing::info!(
            "Site '{}': {} pages visited, {} articles",
            site.name,
            engine.visited_count(),
            engine.article_count()
        );

        let store = engine.finish().await;
        if let Err(e) = store.save(&site_dir.join("data.json")) {
            // Run output for this site is incomplete or absent; later sites
            // still get their chance
            tracing::error!("Failed to write data.json for '{}': {}", site.name, e);
        }
    }

    Ok(())
}

/// Handles the merge subcommand
fn handle_merge(crawl_dir: &Path, output: &Path) -> anyhow::Result<()> {
    let count = vncrawl::merge::merge_to_file(crawl_dir, output)
        .with_context(|| format!("merging {}", crawl_dir.display()))?;
    println!("Merged {} articles into {}", count, output.display());
    Ok(())
}

/// Handles the convert-dates subcommand
fn handle_convert_dates(path: Option<PathBuf>, crawl_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let files = match (path, crawl_dir) {
        (Some(file), _) => vec![file],
        (None, Some(dir)) => {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
                .with_context(|| format!("reading {}", dir.display()))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path().join("data.json"))
                .filter(|p| p.is_file())
                .collect();
            files.sort();
            files
        }
        (None, None) => anyhow::bail!("one of --path or --crawl-dir is required"),
    };

    for file in files {
        let count = vncrawl::dates::convert_file(&file)
            .with_context(|| format!("converting {}", file.display()))?;
        println!("Converted {} dates in {}", count, file.display());
    }

    Ok(())
}
