//! LogSubscriber - writes every notification to tracing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contracts::{ContractError, PresentationShell, Subscriber, SubscriberId};
use tracing::{debug, info};

/// Subscriber that forwards notifications to the log instead of a shell
///
/// Stands in for an external-service sink. It never queues: while offline,
/// messages are skipped. Status changes still reach the shell.
pub struct LogSubscriber {
    id: SubscriberId,
    online: AtomicBool,
    shell: Arc<dyn PresentationShell>,
}

impl LogSubscriber {
    /// Create a LogSubscriber with the given id and initial status
    pub fn new(
        id: impl Into<SubscriberId>,
        online: bool,
        shell: Arc<dyn PresentationShell>,
    ) -> Self {
        Self {
            id: id.into(),
            online: AtomicBool::new(online),
            shell,
        }
    }

    fn notify_status(&self, online: bool) {
        observability::record_status_change(&self.id, online);
        self.shell.on_status_changed(&self.id, online);
    }
}

impl Subscriber for LogSubscriber {
    fn id(&self) -> &SubscriberId {
        &self.id
    }

    fn receive(&self, message: &str) -> Result<(), ContractError> {
        if self.is_online() {
            info!(subscriber = %self.id, message, "Notification received");
        } else {
            debug!(subscriber = %self.id, message, "Subscriber offline, notification skipped");
        }
        Ok(())
    }

    fn set_online(&self, online: bool) {
        let was_online = self.online.swap(online, Ordering::Relaxed);
        if was_online != online {
            info!(subscriber = %self.id, online, "Subscriber status changed");
        }
        self.notify_status(online);
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    fn toggle_online(&self) -> bool {
        let online = !self.online.fetch_xor(true, Ordering::Relaxed);
        info!(subscriber = %self.id, online, "Subscriber status changed");
        self.notify_status(online);
        online
    }
}

impl std::fmt::Debug for LogSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSubscriber")
            .field("id", &self.id)
            .field("online", &self.is_online())
            .finish_non_exhaustive()
    }
}
