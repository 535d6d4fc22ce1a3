//! Error types shared by every stage of a run.
//!
//! Every kind is fatal: `main` logs it and exits with status 1. The one
//! exception to propagation is a rejected directory page under
//! [`PageErrorPolicy::Degrade`](crate::api::PageErrorPolicy), which is
//! logged and swallowed by the paging iterator.

use thiserror::Error;

/// Boxed underlying cause kept for diagnostics.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing mandatory setting or unusable configuration source.
    #[error("{0}")]
    Configuration(String),

    /// Token exchange failed or the authority is malformed.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    /// Missing or unrecognized command.
    #[error("{0}")]
    Usage(String),

    /// Network, IO or decoding failure while talking to the directory.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Cause,
    },

    /// The directory answered a page request with something other than 200.
    #[error("Unexpected response from {url} [statusCode={status},body={body}]")]
    Status { url: String, status: u16, body: String },
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            source: None,
        }
    }

    pub fn authentication_caused_by(
        message: impl Into<String>,
        source: impl Into<Cause>,
    ) -> Self {
        Self::Authentication {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn transport(message: impl Into<String>, source: impl Into<Cause>) -> Self {
        Self::Transport {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
