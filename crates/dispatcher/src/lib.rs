//! # Dispatcher
//!
//! Notification fan-out and offline queueing.
//!
//! Responsibilities:
//! - Keep the registered subscribers, unique by id, in registration order
//! - Fan each broadcast out to every subscriber exactly once
//! - Contain per-subscriber failures (errors and panics)
//! - Queue messages for offline admins and flush them on reconnect

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod shells;
pub mod subscribers;

pub use contracts::{PresentationShell, Subscriber};
pub use dispatcher::{
    create_dispatcher, create_subscriber, Dispatcher, DispatcherBuilder, DispatcherConfig,
    EVENT_PREFIX,
};
pub use error::DispatcherError;
pub use metrics::{
    DispatcherMetrics, DispatcherMetricsSnapshot, SubscriberMetrics, SubscriberMetricsSnapshot,
};
pub use shells::{LogShell, RecordingShell, ShellEvent};
pub use subscribers::{Admin, LogSubscriber};
