//! LogShell - renders notifications via tracing

use contracts::{ContractError, Delivery, PresentationShell, SubscriberId};
use tracing::info;

/// Shell that logs every delivery and status change
///
/// Headless stand-in for a real display.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogShell;

impl LogShell {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationShell for LogShell {
    fn on_delivered(&self, delivery: &Delivery) -> Result<(), ContractError> {
        info!(
            subscriber = %delivery.subscriber,
            kind = %delivery.kind,
            text = %delivery.text(),
            "Notification rendered"
        );
        Ok(())
    }

    fn on_status_changed(&self, subscriber: &SubscriberId, online: bool) {
        info!(
            subscriber = %subscriber,
            status = if online { "Online" } else { "Offline" },
            "Status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_shell_never_fails() {
        let shell = LogShell::new();
        assert!(shell
            .on_delivered(&Delivery::from_storage("a".into(), "m"))
            .is_ok());
        shell.on_status_changed(&"a".into(), true);
    }
}
