//! Dispatcher - fan-out of notifications to registered subscribers

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use contracts::{
    BroadcastReport, PresentationShell, Subscriber, SubscriberConfig, SubscriberId,
    SubscriberKind,
};
use tracing::{debug, error, info, instrument};

use crate::error::DispatcherError;
use crate::metrics::{DispatcherMetrics, DispatcherMetricsSnapshot};
use crate::subscribers::{Admin, LogSubscriber};

/// Prefix applied by [`Dispatcher::raise_event`]
pub const EVENT_PREFIX: &str = "New event: ";

/// Dispatcher configuration
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    /// Subscriber configurations, in registration order
    pub subscribers: Vec<SubscriberConfig>,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    shell: Arc<dyn PresentationShell>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig, shell: Arc<dyn PresentationShell>) -> Self {
        Self { config, shell }
    }

    /// Build the dispatcher and register every configured subscriber
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(subscriber_count = self.config.subscribers.len())
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let dispatcher = Dispatcher::new();
        for config in &self.config.subscribers {
            let subscriber = create_subscriber(config, Arc::clone(&self.shell))?;
            dispatcher.register(subscriber)?;
        }
        Ok(dispatcher)
    }
}

/// Create a subscriber from configuration
#[instrument(
    name = "dispatcher_create_subscriber",
    skip(config, shell),
    fields(subscriber = %config.id, kind = ?config.kind)
)]
pub fn create_subscriber(
    config: &SubscriberConfig,
    shell: Arc<dyn PresentationShell>,
) -> Result<Arc<dyn Subscriber>, DispatcherError> {
    if config.id.is_empty() {
        return Err(DispatcherError::subscriber_creation(
            "",
            "subscriber id cannot be empty",
        ));
    }

    match config.kind {
        SubscriberKind::Admin => {
            let admin =
                Admin::new(config.id.as_str(), config.online, shell).with_limit(config.pending_limit());
            Ok(Arc::new(admin))
        }
        SubscriberKind::Log => {
            if config.pending_capacity.is_some() {
                return Err(DispatcherError::subscriber_creation(
                    &config.id,
                    "pending_capacity is only supported for admin subscribers",
                ));
            }
            Ok(Arc::new(LogSubscriber::new(
                config.id.as_str(),
                config.online,
                shell,
            )))
        }
    }
}

/// Publisher that fans notifications out to its subscribers
///
/// Subscribers are kept in registration order, which is also the delivery
/// order of a broadcast. All methods take `&self`; share it with `Arc`.
pub struct Dispatcher {
    subscribers: RwLock<Vec<Arc<dyn Subscriber>>>,
    metrics: Arc<DispatcherMetrics>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            metrics: Arc::new(DispatcherMetrics::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn Subscriber>>> {
        self.subscribers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<dyn Subscriber>>> {
        self.subscribers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a subscriber
    ///
    /// # Errors
    /// `DuplicateSubscriber` if a subscriber with the same id is registered
    pub fn register(&self, subscriber: Arc<dyn Subscriber>) -> Result<(), DispatcherError> {
        let mut subscribers = self.write();
        if subscribers.iter().any(|s| s.id() == subscriber.id()) {
            return Err(DispatcherError::duplicate(subscriber.id().as_str()));
        }

        info!(
            subscriber = %subscriber.id(),
            online = subscriber.is_online(),
            "Subscriber registered"
        );
        subscribers.push(subscriber);
        Ok(())
    }

    /// Remove a subscriber; returns it, or `None` if it was not registered
    pub fn unregister(&self, id: &str) -> Option<Arc<dyn Subscriber>> {
        let mut subscribers = self.write();
        let index = subscribers.iter().position(|s| s.id() == id)?;
        let removed = subscribers.remove(index);
        info!(subscriber = %removed.id(), "Subscriber unregistered");
        Some(removed)
    }

    /// Look up a registered subscriber
    pub fn get(&self, id: &str) -> Option<Arc<dyn Subscriber>> {
        self.read().iter().find(|s| s.id() == id).cloned()
    }

    /// Registered ids, in registration order
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.read().iter().map(|s| s.id().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Get dispatcher metrics
    pub fn metrics(&self) -> DispatcherMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Deliver `message` to every registered subscriber
    ///
    /// Each subscriber is attempted exactly once. Errors and panics from a
    /// subscriber are logged and counted, never propagated.
    pub fn broadcast(&self, message: &str) -> BroadcastReport {
        // Snapshot so subscribers run without the registry lock held
        let subscribers: Vec<Arc<dyn Subscriber>> = self.read().clone();

        self.metrics.inc_broadcast_count();
        let mut report = BroadcastReport {
            attempted: subscribers.len(),
            ..Default::default()
        };

        for subscriber in &subscribers {
            self.metrics.inc_attempt_count();
            let outcome = catch_unwind(AssertUnwindSafe(|| subscriber.receive(message)));

            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    self.metrics.inc_failure_count();
                    error!(subscriber = %subscriber.id(), error = %e, "Notification failed");
                    report.failures.push(subscriber.id().clone());
                }
                Err(panic) => {
                    self.metrics.inc_failure_count();
                    error!(
                        subscriber = %subscriber.id(),
                        panic = panic_message(panic.as_ref()),
                        "Subscriber panicked during receive"
                    );
                    report.failures.push(subscriber.id().clone());
                }
            }
        }

        debug!(
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed(),
            "Broadcast complete"
        );
        observability::record_broadcast(&report);
        report
    }

    /// Broadcast `"New event: " + description`
    pub fn raise_event(&self, description: &str) -> BroadcastReport {
        self.broadcast(&format!("{EVENT_PREFIX}{description}"))
    }

    /// Shell trigger; same as [`Dispatcher::raise_event`]
    pub fn trigger(&self, description: &str) -> BroadcastReport {
        self.raise_event(description)
    }

    /// Set the online flag of a registered subscriber
    ///
    /// # Errors
    /// `UnknownSubscriber` if `id` is not registered
    pub fn set_online(&self, id: &str, online: bool) -> Result<(), DispatcherError> {
        let subscriber = self.get(id).ok_or_else(|| DispatcherError::unknown(id))?;
        subscriber.set_online(online);
        Ok(())
    }

    /// Flip the online flag of a registered subscriber, returning the new value
    ///
    /// # Errors
    /// `UnknownSubscriber` if `id` is not registered
    pub fn toggle(&self, id: &str) -> Result<bool, DispatcherError> {
        let subscriber = self.get(id).ok_or_else(|| DispatcherError::unknown(id))?;
        Ok(subscriber.toggle_online())
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Convenience function to create a dispatcher from subscriber configs
#[instrument(name = "dispatcher_create", skip(subscriber_configs, shell))]
pub fn create_dispatcher(
    subscriber_configs: Vec<SubscriberConfig>,
    shell: Arc<dyn PresentationShell>,
) -> Result<Dispatcher, DispatcherError> {
    let config = DispatcherConfig {
        subscribers: subscriber_configs,
    };
    DispatcherBuilder::new(config, shell).build()
}
