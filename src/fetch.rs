//! Page transport
//!
//! The builder only sees [`PageFetcher`]. [`HttpFetcher`] is the live
//! implementation: one blocking `reqwest` client whose cookie jar is seeded
//! from a Netscape `cookies.txt` export of a logged-in browser session.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::MigrationConfig;
use crate::{MigrateError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,fa-IR;q=0.8,fa;q=0.7";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of panel page markup
pub trait PageFetcher {
    /// GET `url` with `query` appended and return the body as text
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        (**self).fetch(url, query)
    }
}

/// Authenticated session against the live panel
///
/// Every request goes through the same client, so cookies set by the panel
/// during the run are kept.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a session with browser-like headers and the given cookies
    pub fn new(config: &MigrationConfig, jar: Arc<Jar>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let referer = config.panel_url("");
        let referer = referer.trim_end_matches('/');
        headers.insert(
            header::REFERER,
            HeaderValue::from_str(referer)
                .map_err(|e| MigrateError::Config(format!("referer {}: {}", referer, e)))?,
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_provider(jar)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// Session seeded from a `cookies.txt` file
    pub fn from_cookie_file(config: &MigrationConfig, path: impl AsRef<Path>) -> Result<Self> {
        let jar = load_cookie_jar(path)?;
        Self::new(config, Arc::new(jar))
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(MigrateError::Transport(format!("HTTP {} for {}", status, url)));
        }

        let body = response.text()?;
        trace!("Received {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// One entry of a Netscape cookie file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieEntry {
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub name: String,
    pub value: String,
}

impl CookieEntry {
    /// `Set-Cookie` form understood by the jar
    fn set_cookie(&self) -> String {
        let mut cookie = format!(
            "{}={}; Domain={}; Path={}",
            self.name, self.value, self.domain, self.path
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// URL the cookie is scoped to
    fn origin(&self) -> Result<Url> {
        let host = self.domain.trim_start_matches('.');
        let scheme = if self.secure { "https" } else { "http" };
        Url::parse(&format!("{}://{}{}", scheme, host, self.path))
            .map_err(|e| MigrateError::Config(format!("cookie domain {}: {}", self.domain, e)))
    }
}

/// Parse one line of a Netscape cookie file
///
/// Blank lines and comments yield `None`. The `#HttpOnly_` prefix curl and
/// browsers use is not a comment. Expiry is ignored, as for a session that
/// is replayed once.
pub fn parse_cookie_line(line: &str) -> Result<Option<CookieEntry>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split('\t').collect();
    let [domain, _subdomains, path, secure, _expires, name, value] = fields.as_slice() else {
        return Err(MigrateError::Config(format!(
            "cookie line has {} fields, expected 7",
            fields.len()
        )));
    };

    Ok(Some(CookieEntry {
        domain: domain.to_string(),
        path: if path.is_empty() { "/".to_string() } else { path.to_string() },
        secure: secure.eq_ignore_ascii_case("TRUE"),
        name: name.to_string(),
        value: value.to_string(),
    }))
}

/// Fill a cookie jar from the text of a Netscape cookie file
pub fn cookie_jar_from_str(text: &str) -> Result<Jar> {
    let jar = Jar::default();
    let mut loaded = 0usize;
    for line in text.lines() {
        if let Some(entry) = parse_cookie_line(line)? {
            jar.add_cookie_str(&entry.set_cookie(), &entry.origin()?);
            loaded += 1;
        }
    }
    if loaded == 0 {
        warn!("Cookie file holds no cookies; panel pages will likely redirect to login");
    }
    debug!("Loaded {} cookies", loaded);
    Ok(jar)
}

/// Load a Netscape `cookies.txt` file into a jar
pub fn load_cookie_jar(path: impl AsRef<Path>) -> Result<Jar> {
    let text = std::fs::read_to_string(path.as_ref())?;
    cookie_jar_from_str(&text)
}
