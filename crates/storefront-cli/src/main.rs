use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod scrape;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Discover categories and extract product listings from storefronts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every category linked from a storefront homepage
    Scrape {
        /// Homepage URL; `https://` is assumed when no scheme is given
        url: String,
        #[command(flatten)]
        overrides: ScrapeOverrides,
        /// Maximum number of category links to follow
        #[arg(long)]
        max_categories: Option<usize>,
        /// Abort the whole scrape after this many seconds
        #[arg(long)]
        site_timeout: Option<u64>,
    },
    /// Scrape a single category page and its pagination
    Category {
        /// Absolute category URL
        url: String,
        #[command(flatten)]
        overrides: ScrapeOverrides,
    },
}

/// Flags shared by both subcommands. Each one overrides the value loaded
/// from `STOREFRONT_*` environment variables.
#[derive(Debug, Args, Default, PartialEq, Eq)]
struct ScrapeOverrides {
    /// Maximum pagination pages fetched per category
    #[arg(long)]
    max_pages: Option<usize>,
    /// Maximum number of fetches in flight
    #[arg(long)]
    concurrency: Option<usize>,
    /// Per-fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Ask the fetcher for raw markup without script rendering
    #[arg(long)]
    no_render_js: bool,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loads `.env` before reading `STOREFRONT_*`.
    let mut config = storefront_core::load_scrape_config()?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Scrape {
            url,
            overrides,
            max_categories,
            site_timeout,
        } => {
            apply_site_flags(&mut config, max_categories, site_timeout);
            overrides.apply(&mut config);
            scrape::run_scrape_site(config, &url, overrides.pretty).await?;
        }
        Commands::Category { url, overrides } => {
            overrides.apply(&mut config);
            scrape::run_scrape_category(config, &url, overrides.pretty).await?;
        }
    }

    Ok(())
}

impl ScrapeOverrides {
    fn apply(&self, config: &mut storefront_core::ScrapeConfig) {
        if let Some(max) = self.max_pages {
            config.max_pages_per_category = max;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrent_requests =
                concurrency.clamp(1, storefront_core::MAX_CONCURRENT_REQUESTS);
        }
        if let Some(timeout) = self.timeout {
            config.fetch_timeout_secs = timeout.max(1);
        }
        if self.no_render_js {
            config.render_js = false;
        }
    }
}

/// Applies the `scrape`-only flags. A category cap of zero becomes one,
/// matching what the environment loader accepts.
fn apply_site_flags(
    config: &mut storefront_core::ScrapeConfig,
    max_categories: Option<usize>,
    site_timeout: Option<u64>,
) {
    if let Some(max) = max_categories {
        config.max_category_links = max.max(1);
    }
    if site_timeout.is_some() {
        config.site_timeout_secs = site_timeout;
    }
}

/// Logs go to stderr so stdout carries only the JSON result. `RUST_LOG`
/// takes precedence over the configured level.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests;
