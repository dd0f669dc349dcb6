//! Migration error types

use thiserror::Error;

/// Errors raised while scraping the panel or writing the export
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Unparseable date or missing expected markup field
    #[error("Format error: {0}")]
    Format(String),

    /// A referenced category id is not present in the category table
    #[error("Unknown category id: {0}")]
    Lookup(String),

    /// Page fetch failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error while reading cookies or writing the export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML writer error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// UTF-8 decoding error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl MigrateError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        MigrateError::Format(msg.into())
    }

    /// Whether this error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, MigrateError::Transport(_) | MigrateError::Http(_))
    }
}

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;
