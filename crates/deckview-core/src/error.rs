//! Fetch failures shared by every remote call in the crate.

use thiserror::Error;

/// A single failed GET against one of the remote APIs.
///
/// Every variant remembers the URL that was requested so a failure can be
/// logged with enough context to reproduce it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, TLS, or timeout failure before a response arrived
    #[error("{message}")]
    Network {
        /// The requested URL
        url: String,
        /// Transport-level description
        message: String,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} {reason}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// Numeric status code
        status: u16,
        /// Canonical reason phrase, empty when unknown
        reason: String,
    },

    /// The body arrived but could not be decoded
    #[error("Failed to decode response: {message}")]
    Decode {
        /// The requested URL
        url: String,
        /// Decoder description
        message: String,
    },
}

impl FetchError {
    pub fn network(url: &str, message: impl Into<String>) -> Self {
        FetchError::Network {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn http_status(url: &str, status: u16, reason: impl Into<String>) -> Self {
        FetchError::HttpStatus {
            url: url.to_string(),
            status,
            reason: reason.into(),
        }
    }

    pub fn decode(url: &str, message: impl Into<String>) -> Self {
        FetchError::Decode {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            FetchError::Network { url, .. }
            | FetchError::HttpStatus { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }

    /// Status code, present only when the server actually answered
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message without the URL
    pub fn message(&self) -> String {
        self.to_string().trim_end().to_string()
    }

    /// Text shown in a card slot when its character could not be resolved
    pub fn slot_text(&self) -> String {
        match self.status() {
            Some(code) => format!("{} Code:{}", self.message(), code),
            None => self.message(),
        }
    }
}

impl From<(&str, reqwest::Error)> for FetchError {
    fn from((url, err): (&str, reqwest::Error)) -> Self {
        if err.is_decode() {
            FetchError::decode(url, err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::http_status(url, status.as_u16(), status.canonical_reason().unwrap_or(""))
        } else {
            FetchError::network(url, err.to_string())
        }
    }
}
