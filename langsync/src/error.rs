//! All error types for the langsync crate.
//!
//! Returned from every fallible operation: resource parsing and writing,
//! version-control queries, translation provider calls and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("version control error: {0}")]
    VersionControl(String),

    #[error("provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("unsupported provider `{0}`")]
    UnsupportedProvider(String),

    #[error("unsupported locale `{0}`")]
    UnsupportedLocale(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new provider error with optional source error
    pub fn provider_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Provider {
            message: message.into(),
            source,
        }
    }

    /// Creates a new version control error
    pub fn vcs_error(message: impl Into<String>) -> Self {
        Error::VersionControl(message.into())
    }
}
