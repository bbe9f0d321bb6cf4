//! Layered error definitions
//!
//! Categorized by source: config / session / engine / store

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum TelemetryError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Session Provider Errors =====
    /// Session data could not be read or decoded
    #[error("session error: {message}")]
    Session { message: String },

    /// Unknown entity requested from a session source
    #[error("entity not found in session: {entity}")]
    EntityNotFound { entity: String },

    // ===== Engine Errors =====
    /// Not enough usable data to produce a single timeline tick
    #[error("insufficient data: {message}")]
    InsufficientData { message: String },

    /// A required channel holds a non-finite value after concatenation
    #[error("data integrity error for entity '{entity}', channel '{channel}': {message}")]
    DataIntegrity {
        entity: String,
        channel: String,
        message: String,
    },

    // ===== Store Errors =====
    /// Payload store read error
    #[error("store read error for key '{key}': {message}")]
    StoreRead { key: String, message: String },

    /// Payload store write error
    #[error("store write error for key '{key}': {message}")]
    StoreWrite { key: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl TelemetryError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create session provider error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Create insufficient-data error
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData {
            message: message.into(),
        }
    }

    /// Create data-integrity error
    pub fn data_integrity(
        entity: impl Into<String>,
        channel: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::DataIntegrity {
            entity: entity.into(),
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create store read error
    pub fn store_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreRead {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create store write error
    pub fn store_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            key: key.into(),
            message: message.into(),
        }
    }
}
