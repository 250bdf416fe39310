//! Command-line interface for the catalog scraper

use clap::{Parser, Subcommand};
use javdb_client::config::{load_config, Config};
use javdb_client::crawler::{Crawler, DetailMode, Endpoint};
use javdb_client::session::Session;
use javdb_client::taxonomy::{parse_selector, TagSelectors, TaxonomyStore};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scrapes video, actor, and tag records from the catalog
#[derive(Parser, Debug)]
#[command(name = "javdb-client")]
#[command(version = "1.0.0")]
#[command(about = "Catalog scraper with host failover and a cached tag taxonomy", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write JSON output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the full detail record for one video id
    Detail {
        video_id: String,
    },

    /// Search by work code and fetch the first hit's detail
    Code {
        code: String,
    },

    /// Collect an actor's works across pages
    Actor {
        name: String,
        /// Fetch every work's detail page and merge it in
        #[arg(long)]
        full: bool,
    },

    /// Collect works under a single tag id
    Tag {
        tag_id: String,
        #[arg(long)]
        full: bool,
    },

    /// Collect works matching combined tag selectors (e.g. -s c1=23 -s c3=78)
    SearchTags {
        #[arg(short, long = "select", value_name = "cN=ID", required = true)]
        selectors: Vec<String>,
        #[arg(long)]
        full: bool,
    },

    /// Keyword search, one page of stubs
    Search {
        keyword: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Tag taxonomy operations
    Tags {
        #[command(subcommand)]
        command: TagsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TagsCommand {
    /// Fetch the taxonomy (cache-first unless --force)
    Fetch {
        #[arg(long)]
        force: bool,
    },
    /// Search cached tags by name substring
    Search {
        name: String,
    },
    /// List cached categories with tag counts
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    let session = Session::from_cookie_file(&config.session.cookie_file, &config.site.hosts);
    let mut crawler = Crawler::new(&config, Some(&session))?;

    match cli.command {
        Command::Detail { video_id } => {
            let detail = crawler.video_detail(&video_id).await?;
            emit(&cli.output, &detail)?;
        }
        Command::Code { code } => match crawler.video_by_code(&code).await? {
            Some(detail) => emit(&cli.output, &detail)?,
            None => {
                tracing::warn!("No work found for code {}", code);
            }
        },
        Command::Actor { name, full } => {
            let works = crawler.actor_works(&name, detail_mode(full)).await?;
            emit(&cli.output, &works)?;
        }
        Command::Tag { tag_id, full } => {
            let works = crawler
                .collect_works(&Endpoint::tag(&tag_id), detail_mode(full))
                .await?;
            emit(&cli.output, &works)?;
        }
        Command::SearchTags { selectors, full } => {
            let mut map = TagSelectors::new();
            for arg in &selectors {
                let (category, tag_id) = parse_selector(arg)?;
                map.insert(category, tag_id);
            }
            let works = crawler
                .collect_works(&Endpoint::tags(map), detail_mode(full))
                .await?;
            emit(&cli.output, &works)?;
        }
        Command::Search { keyword, page } => {
            let result = crawler
                .works_page(&Endpoint::keyword(&keyword), page)
                .await?;
            emit(&cli.output, &result)?;
        }
        Command::Tags { command } => {
            let host = &config.site.hosts[0];
            let base_url = if host.contains("://") {
                host.clone()
            } else {
                format!("https://{}", host)
            };
            let mut store = TaxonomyStore::new(&config.cache.tags_path, &base_url);
            match command {
                TagsCommand::Fetch { force } => {
                    if force && !session.is_authenticated() {
                        tracing::warn!(
                            "No session cookies loaded; the taxonomy page may require login"
                        );
                    }
                    let taxonomy = store.fetch(crawler.client_mut(), force).await?;
                    emit(&cli.output, &taxonomy.category_list())?;
                }
                TagsCommand::Search { name } => {
                    emit(&cli.output, &store.search_by_name(&name))?;
                }
                TagsCommand::List => {
                    emit(&cli.output, &store.category_list())?;
                }
            }
        }
    }

    let stats = crawler.stats();
    tracing::info!(
        "Requests: {} total, {} ok ({:.1}%)",
        stats.request_count,
        stats.success_count,
        stats.success_rate
    );

    Ok(())
}

fn detail_mode(full: bool) -> DetailMode {
    if full {
        DetailMode::Full
    } else {
        DetailMode::Basic
    }
}

/// Writes a value as pretty JSON to the chosen sink
fn emit<T: Serialize>(output: &Option<PathBuf>, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Wrote output to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("javdb_client=info,warn"),
            1 => EnvFilter::new("javdb_client=debug,info"),
            2 => EnvFilter::new("javdb_client=trace,debug"),
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
