//! Error types for Jira operations

use thiserror::Error;

/// Result type for Jira operations
pub type Result<T> = std::result::Result<T, Error>;

/// Longest slice of a response body kept in an HTTP error
pub const MAX_ERROR_DETAIL: usize = 300;

/// Errors that can occur during Jira operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connection refused, TLS, bad JSON body)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}{}", format_detail(.detail))]
    Http {
        /// Status code
        status: u16,
        /// Start of the response body, if one was returned
        detail: Option<String>,
    },

    /// Base URL could not be parsed
    #[error("Invalid Jira URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an HTTP error, keeping at most [`MAX_ERROR_DETAIL`] characters of the body
    pub fn http(status: u16, body: &str) -> Self {
        let detail = if body.is_empty() {
            None
        } else {
            Some(body.chars().take(MAX_ERROR_DETAIL).collect())
        };
        Error::Http { status, detail }
    }
}

fn format_detail(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}
