//! Error types for the reconciliation core
//!
//! Only [`Error::Resolution`] and [`Error::ZoneList`] abort a cycle. Every
//! other variant is produced for a single zone or record and is turned into
//! a per-host outcome by the engine.

use thiserror::Error;

/// Result type alias for flaresync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for flaresync
#[derive(Error, Debug)]
pub enum Error {
    /// No lookup endpoint produced a valid address within the attempt budget
    #[error("Failed to resolve public IP after {attempts} attempt(s)")]
    Resolution {
        /// Number of full passes over the endpoint list
        attempts: usize,
    },

    /// Listing the zones visible to the credential failed
    #[error("Failed to list zones: {0}")]
    ZoneList(String),

    /// Listing the A records of a zone failed
    #[error("Failed to list records for zone {zone}: {message}")]
    RecordList {
        /// Zone name
        zone: String,
        /// Failure description
        message: String,
    },

    /// A requested hostname has no matching A record
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// The provider rejected or never received a record update
    #[error("Failed to update {record}: {message}")]
    Update {
        /// Hostname of the record
        record: String,
        /// Failure description
        message: String,
    },

    /// A value failed a format check
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a zone listing error
    pub fn zone_list(msg: impl Into<String>) -> Self {
        Self::ZoneList(msg.into())
    }

    /// Create a record listing error
    pub fn record_list(zone: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordList {
            zone: zone.into(),
            message: message.into(),
        }
    }

    /// Create an update error
    pub fn update(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Update {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts the whole reconciliation cycle
    pub fn is_cycle_fatal(&self) -> bool {
        matches!(self, Self::Resolution { .. } | Self::ZoneList(_))
    }
}
