//! RecordingShell - keeps every callback in memory

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{ContractError, Delivery, PresentationShell, SubscriberId};

/// One callback received by a [`RecordingShell`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Delivered(Delivery),
    StatusChanged { subscriber: SubscriberId, online: bool },
}

/// Shell that records callbacks for inspection
///
/// Used by tests and by hosts that render asynchronously. Deliveries to the
/// subscribers passed to [`RecordingShell::failing_for`] are rejected with a
/// delivery error instead of being recorded.
#[derive(Debug, Default)]
pub struct RecordingShell {
    events: Mutex<Vec<ShellEvent>>,
    failing: HashSet<String>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shell that fails every delivery addressed to `subscribers`
    pub fn failing_for<I, S>(subscribers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            events: Mutex::new(Vec::new()),
            failing: subscribers.into_iter().map(Into::into).collect(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ShellEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All callbacks, in arrival order
    pub fn events(&self) -> Vec<ShellEvent> {
        self.lock().clone()
    }

    /// All recorded deliveries, in arrival order
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                ShellEvent::Delivered(delivery) => Some(delivery.clone()),
                ShellEvent::StatusChanged { .. } => None,
            })
            .collect()
    }

    /// Rendered texts delivered to one subscriber
    pub fn texts_for(&self, subscriber: &str) -> Vec<String> {
        self.deliveries()
            .into_iter()
            .filter(|delivery| delivery.subscriber == subscriber)
            .map(|delivery| delivery.text())
            .collect()
    }

    /// Status callbacks for one subscriber
    pub fn statuses_for(&self, subscriber: &str) -> Vec<bool> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                ShellEvent::StatusChanged {
                    subscriber: id,
                    online,
                } if id == subscriber => Some(*online),
                _ => None,
            })
            .collect()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl PresentationShell for RecordingShell {
    fn on_delivered(&self, delivery: &Delivery) -> Result<(), ContractError> {
        if self.failing.contains(delivery.subscriber.as_str()) {
            return Err(ContractError::delivery(
                delivery.subscriber.as_str(),
                "render sink unavailable",
            ));
        }
        self.lock().push(ShellEvent::Delivered(delivery.clone()));
        Ok(())
    }

    fn on_status_changed(&self, subscriber: &SubscriberId, online: bool) {
        self.lock().push(ShellEvent::StatusChanged {
            subscriber: subscriber.clone(),
            online,
        });
    }
}
