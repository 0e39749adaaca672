//! Admin - subscriber with an offline queue
//!
//! ```text
//!              receive(m)                       receive(m)
//!   ┌────────┐ ─────────► render "Real-time"    ┌─────────┐ ─────────► pending.push_back(m)
//!   │ Online │                                   │ Offline │
//!   └────────┘ ◄──── set_online(true) ────────── └─────────┘
//!        │          flush pending in order,           ▲
//!        │          render "Delivered from storage"   │
//!        └────────────── set_online(false) ───────────┘
//! ```

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{
    ContractError, Delivery, DeliveryKind, OverflowPolicy, PendingLimit, PresentationShell,
    Subscriber, SubscriberId,
};
use tracing::{debug, error, info, warn};

use crate::dispatcher::panic_message;
use crate::metrics::SubscriberMetrics;

/// Online flag and pending queue, always mutated together
#[derive(Debug)]
struct AdminState {
    online: bool,
    pending: VecDeque<String>,
}

/// Notification subscriber that queues while offline
///
/// The state lock is held while rendering, so a flush and a concurrent
/// `receive` serialize: the new message joins the flush or is rendered
/// right after it.
pub struct Admin {
    id: SubscriberId,
    state: Mutex<AdminState>,
    limit: PendingLimit,
    shell: Arc<dyn PresentationShell>,
    metrics: Arc<SubscriberMetrics>,
}

impl Admin {
    /// Create an admin with an unbounded pending queue
    pub fn new(
        id: impl Into<SubscriberId>,
        online: bool,
        shell: Arc<dyn PresentationShell>,
    ) -> Self {
        Self {
            id: id.into(),
            state: Mutex::new(AdminState {
                online,
                pending: VecDeque::new(),
            }),
            limit: PendingLimit::unbounded(),
            shell,
            metrics: Arc::new(SubscriberMetrics::new()),
        }
    }

    /// Bound the pending queue
    ///
    /// A capacity of zero is treated as one.
    pub fn with_limit(mut self, limit: PendingLimit) -> Self {
        self.limit = PendingLimit {
            capacity: limit.capacity.map(|c| c.max(1)),
            overflow: limit.overflow,
        };
        self
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SubscriberMetrics> {
        &self.metrics
    }

    fn state(&self) -> MutexGuard<'_, AdminState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, kind: DeliveryKind, message: &str) -> Result<(), ContractError> {
        let delivery = Delivery {
            subscriber: self.id.clone(),
            kind,
            message: message.to_owned(),
        };

        if let Err(e) = self.shell.on_delivered(&delivery) {
            self.metrics.inc_failure_count();
            observability::record_delivery_failure(&self.id);
            return Err(e);
        }

        match kind {
            DeliveryKind::RealTime => self.metrics.inc_real_time_count(),
            DeliveryKind::FromStorage => self.metrics.inc_flushed_count(),
        }
        observability::record_delivery(&self.id, kind);
        debug!(subscriber = %self.id, kind = %kind, "Notification delivered");
        Ok(())
    }

    fn store(&self, state: &mut AdminState, message: &str) -> Result<(), ContractError> {
        if let Some(capacity) = self.limit.capacity {
            if state.pending.len() >= capacity {
                self.metrics.inc_dropped_count();
                observability::record_pending_dropped(&self.id);

                match self.limit.overflow {
                    OverflowPolicy::DropOldest => {
                        state.pending.pop_front();
                        warn!(
                            subscriber = %self.id,
                            capacity,
                            "Pending queue full, oldest notification dropped"
                        );
                    }
                    OverflowPolicy::Reject => {
                        warn!(
                            subscriber = %self.id,
                            capacity,
                            "Pending queue full, notification rejected"
                        );
                        return Err(ContractError::pending_overflow(self.id.as_str(), capacity));
                    }
                }
            }
        }

        state.pending.push_back(message.to_owned());
        self.metrics.inc_stored_count();
        self.metrics.set_pending_len(state.pending.len());
        observability::record_message_stored(&self.id);
        observability::record_pending_depth(&self.id, state.pending.len());
        debug!(
            subscriber = %self.id,
            pending = state.pending.len(),
            "Notification stored for offline subscriber"
        );
        Ok(())
    }

    fn flush(&self, state: &mut AdminState) {
        let pending = std::mem::take(&mut state.pending);
        self.metrics.set_pending_len(0);
        observability::record_pending_depth(&self.id, 0);

        if pending.is_empty() {
            return;
        }

        let total = pending.len();
        let mut failed = 0usize;
        // The queue is already taken, so a panicking shell must not end the loop
        for message in &pending {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                self.deliver(DeliveryKind::FromStorage, message)
            }));

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failed += 1;
                    error!(subscriber = %self.id, error = %e, "Stored notification not rendered");
                }
                Err(panic) => {
                    failed += 1;
                    self.metrics.inc_failure_count();
                    observability::record_delivery_failure(&self.id);
                    error!(
                        subscriber = %self.id,
                        panic = panic_message(panic.as_ref()),
                        "Shell panicked while rendering stored notification"
                    );
                }
            }
        }

        info!(
            subscriber = %self.id,
            delivered = total - failed,
            failed,
            "Flushed stored notifications"
        );
    }

    /// Apply a status and notify the shell; caller holds the lock
    fn apply_status(&self, state: &mut AdminState, online: bool) {
        let was_online = state.online;
        state.online = online;

        if online && !was_online {
            self.flush(state);
        }
        if online != was_online {
            info!(subscriber = %self.id, online, "Subscriber status changed");
        }

        observability::record_status_change(&self.id, online);
        self.shell.on_status_changed(&self.id, online);
    }
}

impl Subscriber for Admin {
    fn id(&self) -> &SubscriberId {
        &self.id
    }

    fn receive(&self, message: &str) -> Result<(), ContractError> {
        let mut state = self.state();
        if state.online {
            self.deliver(DeliveryKind::RealTime, message)
        } else {
            self.store(&mut state, message)
        }
    }

    fn set_online(&self, online: bool) {
        let mut state = self.state();
        self.apply_status(&mut state, online);
    }

    fn is_online(&self) -> bool {
        self.state().online
    }

    fn toggle_online(&self) -> bool {
        let mut state = self.state();
        let online = !state.online;
        self.apply_status(&mut state, online);
        online
    }

    fn pending(&self) -> Vec<String> {
        self.state().pending.iter().cloned().collect()
    }
}

impl std::fmt::Debug for Admin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("state", &*self.state())
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shells::RecordingShell;

    fn admin(online: bool) -> (Admin, Arc<RecordingShell>) {
        let shell = Arc::new(RecordingShell::new());
        (Admin::new("a", online, shell.clone()), shell)
    }

    #[test]
    fn test_online_receive_renders_real_time() {
        let (admin, shell) = admin(true);
        admin.receive("hello").unwrap();

        assert_eq!(shell.texts_for("a"), vec!["Real-time: hello".to_string()]);
        assert!(admin.pending().is_empty());
        assert_eq!(admin.metrics().real_time_count(), 1);
    }

    #[test]
    fn test_offline_receive_queues_in_order() {
        let (admin, shell) = admin(false);
        for m in ["m1", "m2", "m3"] {
            admin.receive(m).unwrap();
        }

        assert!(shell.deliveries().is_empty());
        assert_eq!(admin.pending(), vec!["m1", "m2", "m3"]);
        assert_eq!(admin.metrics().pending_len(), 3);
    }

    #[test]
    fn test_reconnect_flushes_once_in_order() {
        let (admin, shell) = admin(false);
        admin.receive("m1").unwrap();
        admin.receive("m2").unwrap();

        admin.set_online(true);
        admin.set_online(true);

        assert_eq!(
            shell.texts_for("a"),
            vec![
                "Delivered from storage: m1".to_string(),
                "Delivered from storage: m2".to_string(),
            ]
        );
        assert!(admin.pending().is_empty());
        assert_eq!(admin.metrics().flushed_count(), 2);
    }

    #[test]
    fn test_going_offline_keeps_queue_untouched() {
        let (admin, shell) = admin(false);
        admin.receive("m1").unwrap();
        admin.set_online(false);

        assert_eq!(admin.pending(), vec!["m1"]);
        assert!(shell.deliveries().is_empty());
    }

    #[test]
    fn test_status_callback_after_every_call() {
        let (admin, shell) = admin(true);
        admin.set_online(true);
        admin.set_online(false);
        assert!(admin.toggle_online());

        assert_eq!(shell.statuses_for("a"), vec![true, false, true]);
        assert!(admin.is_online());
    }

    #[test]
    fn test_flush_precedes_status_callback() {
        let (admin, shell) = admin(false);
        admin.receive("m1").unwrap();
        admin.toggle_online();

        let events = shell.events();
        assert!(matches!(events[0], crate::shells::ShellEvent::Delivered(_)));
        assert!(matches!(
            events[1],
            crate::shells::ShellEvent::StatusChanged { online: true, .. }
        ));
    }

    #[test]
    fn test_render_failure_surfaces_from_receive() {
        let shell = Arc::new(RecordingShell::failing_for(["a"]));
        let admin = Admin::new("a", true, shell);

        let result = admin.receive("m");
        assert!(matches!(result, Err(ContractError::Delivery { .. })));
        assert_eq!(admin.metrics().failure_count(), 1);
    }

    #[test]
    fn test_flush_failure_still_clears_queue() {
        let shell = Arc::new(RecordingShell::failing_for(["a"]));
        let admin = Admin::new("a", false, shell.clone());
        admin.receive("m1").unwrap();
        admin.receive("m2").unwrap();

        admin.set_online(true);

        assert!(admin.is_online());
        assert!(admin.pending().is_empty());
        assert_eq!(admin.metrics().failure_count(), 2);
        assert_eq!(shell.statuses_for("a"), vec![true]);
    }

    /// Shell that panics when asked to render one particular message
    struct PanicOnMessage {
        inner: RecordingShell,
        message: &'static str,
    }

    impl PresentationShell for PanicOnMessage {
        fn on_delivered(&self, delivery: &Delivery) -> Result<(), ContractError> {
            if delivery.message == self.message {
                panic!("cannot render {}", delivery.message);
            }
            self.inner.on_delivered(delivery)
        }

        fn on_status_changed(&self, subscriber: &SubscriberId, online: bool) {
            self.inner.on_status_changed(subscriber, online);
        }
    }

    #[test]
    fn test_flush_survives_shell_panic() {
        let shell = Arc::new(PanicOnMessage {
            inner: RecordingShell::new(),
            message: "m1",
        });
        let admin = Admin::new("a", false, shell.clone());
        admin.receive("m1").unwrap();
        admin.receive("m2").unwrap();

        admin.set_online(true);

        assert!(admin.is_online());
        assert!(admin.pending().is_empty());
        assert_eq!(
            shell.inner.texts_for("a"),
            vec!["Delivered from storage: m2".to_string()]
        );
        assert_eq!(admin.metrics().failure_count(), 1);
        assert_eq!(admin.metrics().flushed_count(), 1);
        assert_eq!(shell.inner.statuses_for("a"), vec![true]);
    }

    #[test]
    fn test_drop_oldest_overflow() {
        let (admin, _shell) = admin(false);
        let admin = admin.with_limit(PendingLimit::bounded(2, OverflowPolicy::DropOldest));
        for m in ["m1", "m2", "m3"] {
            admin.receive(m).unwrap();
        }

        assert_eq!(admin.pending(), vec!["m2", "m3"]);
        assert_eq!(admin.metrics().dropped_count(), 1);
    }

    #[test]
    fn test_reject_overflow() {
        let (admin, _shell) = admin(false);
        let admin = admin.with_limit(PendingLimit::bounded(1, OverflowPolicy::Reject));
        admin.receive("m1").unwrap();

        let result = admin.receive("m2");
        assert!(matches!(
            result,
            Err(ContractError::PendingOverflow { capacity: 1, .. })
        ));
        assert_eq!(admin.pending(), vec!["m1"]);
    }

    #[test]
    fn test_zero_capacity_treated_as_one() {
        let (admin, _shell) = admin(false);
        let admin = admin.with_limit(PendingLimit::bounded(0, OverflowPolicy::DropOldest));
        admin.receive("m1").unwrap();
        admin.receive("m2").unwrap();
        assert_eq!(admin.pending(), vec!["m2"]);
    }
}
