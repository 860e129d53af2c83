//! Fetch error kinds
//!
//! Callers never propagate these to a global handler: every fetch site turns
//! them into display state ("failed to load") and logs the cause.

use std::fmt;

/// Why a request to the blog API did not produce data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Request could not be sent or the connection failed
    Network(String),
    /// Server answered with a non-2xx status
    Http { status: u16 },
    /// Body was not the JSON we expected
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Http { status } => write!(f, "HTTP error: status {}", status),
            Self::Decode(msg) => write!(f, "Invalid response body: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
