//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-level misuse, surfaced to the caller
///
/// Subscriber-level delivery failures never show up here; broadcast
/// contains them and reports them through `BroadcastReport`.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Identity already registered
    #[error("subscriber '{id}' is already registered")]
    DuplicateSubscriber { id: String },

    /// Identity not registered
    #[error("subscriber '{id}' is not registered")]
    UnknownSubscriber { id: String },

    /// Subscriber creation error
    #[error("failed to create subscriber '{id}': {message}")]
    SubscriberCreation { id: String, message: String },
}

impl DispatcherError {
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateSubscriber { id: id.into() }
    }

    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownSubscriber { id: id.into() }
    }

    /// Create a subscriber creation error
    pub fn subscriber_creation(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SubscriberCreation {
            id: id.into(),
            message: message.into(),
        }
    }
}
