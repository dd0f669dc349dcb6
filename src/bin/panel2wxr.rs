// Command-line entry point: scrape one blog's panel and write the export file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use panel2wxr::config::{
    DEFAULT_LANGUAGE, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, DEFAULT_PANEL_ROOT, DEFAULT_TIME_ZONE,
};
use panel2wxr::{wxr, HttpFetcher, Migration, MigrationConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "panel2wxr")]
#[command(about = "Export a blog.ir blog as a WordPress WXR file", version)]
struct Cli {
    /// Blog name as it appears in panel URLs
    blog: String,

    /// Base URL of the destination WordPress site
    #[arg(long)]
    site_url: String,

    /// Channel title (defaults to the blog name)
    #[arg(long)]
    title: Option<String>,

    /// Netscape cookies.txt of a logged-in panel session
    #[arg(long, default_value = "cookies.txt")]
    cookies: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "export.xml")]
    output: PathBuf,

    /// Author login for posts without an author label
    #[arg(long, default_value = "admin")]
    default_author: String,

    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    language: String,

    #[arg(long, default_value = DEFAULT_PANEL_ROOT)]
    panel_root: String,

    /// Rows requested per listing page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Stop a listing after this many pages
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// IANA zone of the panel's displayed times
    #[arg(long, default_value = DEFAULT_TIME_ZONE)]
    time_zone: String,

    /// Read times at this fixed offset from UTC, in minutes, instead of the zone
    #[arg(long, allow_negative_numbers = true)]
    utc_offset: Option<i32>,
}

impl Cli {
    fn into_config(self) -> (MigrationConfig, PathBuf, PathBuf) {
        let mut config = MigrationConfig::new(self.blog, self.site_url)
            .with_language(self.language)
            .with_panel_root(self.panel_root)
            .with_default_author(self.default_author)
            .with_page_size(self.page_size)
            .with_max_pages(self.max_pages)
            .with_time_zone(self.time_zone);
        if let Some(minutes) = self.utc_offset {
            config = config.with_utc_offset_minutes(minutes);
        }
        if let Some(title) = self.title {
            config = config.with_site_title(title);
        }
        (config, self.cookies, self.output)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (config, cookies, output) = Cli::parse().into_config();
    config.validate().context("Invalid arguments")?;

    let fetcher = HttpFetcher::from_cookie_file(&config, &cookies)
        .with_context(|| format!("Failed to set up session from {}", cookies.display()))?;

    tracing::info!("Migrating {} from {}", config.blog, config.panel_root);
    let channel = Migration::new(config, fetcher)?
        .run()
        .context("Migration aborted")?;

    wxr::write_file(&channel, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
