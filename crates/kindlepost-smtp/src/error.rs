//! Error types for SMTP delivery.

use std::io;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP delivery error types.
///
/// Every variant is fatal to the single delivery attempt: nothing is
/// caught and retried, and each error is surfaced to the caller with its
/// underlying cause attached.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error on the transport.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Recipient address is not of the form `local@domain`.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Mail exchanger lookup failed.
    #[error("MX resolution failed ({domain}): {source}")]
    Resolution {
        /// Domain that was queried, or what resolution was attempted.
        domain: String,
        /// Underlying resolver error.
        #[source]
        source: hickory_resolver::ResolveError,
    },

    /// The domain has no usable mail exchanger.
    #[error("No mail exchanger found for domain: {0}")]
    NoExchanger(String),

    /// TCP connection to the exchanger could not be established.
    #[error("Connection to {host} failed: {source}")]
    Connect {
        /// Host that was dialed.
        host: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// TCP connection attempt exceeded the configured timeout.
    #[error("Connection to {host} timed out")]
    ConnectTimeout {
        /// Host that was dialed.
        host: String,
    },

    /// Server rejected a command with an error reply.
    #[error("SMTP error {code}: {message}")]
    Rejected {
        /// Reply code (e.g., 550).
        code: u16,
        /// Error message from server.
        message: String,
    },

    /// Malformed or unexpected server response.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Fewer message bytes were accepted during DATA than were sent.
    #[error("Short write during data transfer: {written} of {expected} bytes accepted")]
    ShortWrite {
        /// Bytes the transport accepted.
        written: usize,
        /// Bytes that were expected to be accepted.
        expected: usize,
    },
}

impl Error {
    /// Creates a rejection error from a reply code and message.
    #[must_use]
    pub fn rejected(code: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Returns true if this is a permanent server rejection (5xx).
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if *code >= 500 && *code < 600)
    }

    /// Returns true if this is a transient server rejection (4xx).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Rejected { code, .. } if *code >= 400 && *code < 500)
    }
}
