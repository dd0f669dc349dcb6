//! Migration configuration

use chrono::FixedOffset;
use chrono_tz::Tz;

use crate::calendar::PanelZone;
use crate::{MigrateError, Result};

/// Default host serving the admin panel
pub const DEFAULT_PANEL_ROOT: &str = "https://blog.ir";
/// Number of rows requested per listing page
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Hard cap on pages fetched for one listing
pub const DEFAULT_MAX_PAGES: usize = 1000;
/// Zone the panel displays its times in
pub const DEFAULT_TIME_ZONE: &str = "Asia/Tehran";
/// Language tag written into the channel
pub const DEFAULT_LANGUAGE: &str = "fa_IR";

/// Inputs of one migration run
///
/// # Example
///
/// ```
/// use panel2wxr::MigrationConfig;
///
/// let config = MigrationConfig::new("kaliuser", "https://domain.tld")
///     .with_default_author("editor")
///     .with_page_size(50);
///
/// assert_eq!(config.site_title, "kaliuser");
/// assert_eq!(config.page_size, 50);
/// assert!(config.validate().is_ok());
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MigrationConfig {
    /// Blog name in the panel URLs (`/panel/{blog}/...`)
    pub blog: String,

    /// Channel title of the export
    pub site_title: String,

    /// Base URL of the destination site; item links are `{base_url}/{slug}`
    pub base_url: String,

    /// Language tag of the channel
    #[cfg_attr(feature = "serde", serde(default = "default_language"))]
    pub language: String,

    /// Scheme and host of the admin panel
    #[cfg_attr(feature = "serde", serde(default = "default_panel_root"))]
    pub panel_root: String,

    /// Author login used when a post page carries no usable author label
    pub default_author: String,

    /// Rows per listing page
    #[cfg_attr(feature = "serde", serde(default = "default_page_size"))]
    pub page_size: usize,

    /// Upper bound on pages fetched for a single listing
    #[cfg_attr(feature = "serde", serde(default = "default_max_pages"))]
    pub max_pages: usize,

    /// IANA zone of the panel's local time
    #[cfg_attr(feature = "serde", serde(default = "default_time_zone"))]
    pub time_zone: String,

    /// Fixed offset from UTC in minutes; overrides `time_zone` when set
    #[cfg_attr(feature = "serde", serde(default))]
    pub utc_offset_minutes: Option<i32>,
}

#[cfg(feature = "serde")]
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[cfg(feature = "serde")]
fn default_panel_root() -> String {
    DEFAULT_PANEL_ROOT.to_string()
}

#[cfg(feature = "serde")]
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[cfg(feature = "serde")]
fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

#[cfg(feature = "serde")]
fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

impl MigrationConfig {
    /// Create a configuration for `blog`, exporting to `base_url`
    ///
    /// The channel title defaults to the blog name.
    pub fn new(blog: impl Into<String>, base_url: impl Into<String>) -> Self {
        let blog = blog.into();
        Self {
            site_title: blog.clone(),
            blog,
            base_url: base_url.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            panel_root: DEFAULT_PANEL_ROOT.to_string(),
            default_author: "admin".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            utc_offset_minutes: None,
        }
    }

    pub fn with_site_title(mut self, title: impl Into<String>) -> Self {
        self.site_title = title.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_panel_root(mut self, root: impl Into<String>) -> Self {
        self.panel_root = root.into();
        self
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.time_zone = zone.into();
        self
    }

    /// Read times at a constant offset instead of `time_zone`
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = Some(minutes);
        self
    }

    /// Zone of the panel's displayed times
    pub fn zone(&self) -> Result<PanelZone> {
        if let Some(minutes) = self.utc_offset_minutes {
            return minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .map(PanelZone::Fixed)
                .ok_or_else(|| {
                    MigrateError::Config(format!("UTC offset out of range: {} minutes", minutes))
                });
        }
        self.time_zone
            .parse::<Tz>()
            .map(PanelZone::Named)
            .map_err(|e| MigrateError::Config(format!("time zone {}: {}", self.time_zone, e)))
    }

    /// Base URL without a trailing slash
    pub fn site_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `{panel_root}/panel/{blog}/{section}`
    pub fn panel_url(&self, section: &str) -> String {
        format!(
            "{}/panel/{}/{}",
            self.panel_root.trim_end_matches('/'),
            self.blog,
            section
        )
    }

    /// Absolute URL for an href found on a panel page
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}{}", self.panel_root.trim_end_matches('/'), href)
        }
    }

    /// Check the configuration before a run starts
    pub fn validate(&self) -> Result<()> {
        if self.blog.trim().is_empty() {
            return Err(MigrateError::Config("blog name is empty".to_string()));
        }
        if self.blog.contains('/') {
            return Err(MigrateError::Config(format!(
                "blog name must not contain '/': {}",
                self.blog
            )));
        }
        if self.default_author.trim().is_empty() {
            return Err(MigrateError::Config("default author is empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(MigrateError::Config("page size must be positive".to_string()));
        }
        if self.max_pages == 0 {
            return Err(MigrateError::Config("max pages must be positive".to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| MigrateError::Config(format!("base URL {}: {}", self.base_url, e)))?;
        url::Url::parse(&self.panel_root)
            .map_err(|e| MigrateError::Config(format!("panel root {}: {}", self.panel_root, e)))?;
        self.zone()?;
        Ok(())
    }
}
