//! Error types for adapters.

use std::fmt;

use thiserror::Error;

/// Errors that can occur when collecting readings from the modem.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed or the modem answered with a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The response body exceeded the configured buffer limit.
    #[error("Response body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Maximum number of bytes accepted.
        limit: usize,
    },

    /// The page does not have the table structure the layout expects.
    #[error("Unexpected page layout: {0}")]
    Layout(String),

    /// A cell could not be coerced into the value its column requires.
    #[error("Bad {field} in {table} row {row}: {source}")]
    Field {
        /// Table name ("downstream" or "upstream").
        table: &'static str,
        /// Zero-based index of the row within the table, headers included.
        row: usize,
        /// Field name from the column layout.
        field: &'static str,
        /// The underlying coercion failure.
        #[source]
        source: CoerceError,
    },
}

/// Coarse classification of an [`AdapterError`].
///
/// Connectivity loss, a changed page template and corrupt cell data call for
/// different responses from whoever reads the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or HTTP failure.
    Transport,
    /// Page structure does not match the expected layout.
    Layout,
    /// A cell's content could not be parsed.
    Data,
}

impl AdapterError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Http(_)
            | AdapterError::Connection(_)
            | AdapterError::Timeout
            | AdapterError::BodyTooLarge { .. } => ErrorKind::Transport,
            AdapterError::Layout(_) => ErrorKind::Layout,
            AdapterError::Field { .. } => ErrorKind::Data,
        }
    }

    /// Whether this error came from the request timing out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AdapterError::Timeout)
    }
}

impl ErrorKind {
    /// Short lowercase name, suitable for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Layout => "layout",
            ErrorKind::Data => "data",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}

/// A raw cell that could not be turned into a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    /// Nothing left to parse after trimming and stripping.
    #[error("empty value")]
    Empty,

    /// The leading token is not a valid integer.
    #[error("invalid integer {0:?}")]
    Integer(String),

    /// The leading token is not a valid float.
    #[error("invalid float {0:?}")]
    Float(String),
}
