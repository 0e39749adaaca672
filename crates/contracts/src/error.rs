//! Layered error definitions
//!
//! Categorized by source: config / delivery / queue

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
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

    // ===== Delivery Errors =====
    /// Delivery to a subscriber failed (render sink, external service)
    #[error("delivery to '{subscriber}' failed: {message}")]
    Delivery { subscriber: String, message: String },

    /// Pending queue full and the overflow policy rejects new messages
    #[error("pending queue of '{subscriber}' is full (capacity {capacity})")]
    PendingOverflow { subscriber: String, capacity: usize },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
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

    /// Create delivery error
    pub fn delivery(subscriber: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            subscriber: subscriber.into(),
            message: message.into(),
        }
    }

    /// Create pending overflow error
    pub fn pending_overflow(subscriber: impl Into<String>, capacity: usize) -> Self {
        Self::PendingOverflow {
            subscriber: subscriber.into(),
            capacity,
        }
    }
}
