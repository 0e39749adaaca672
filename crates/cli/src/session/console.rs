//! ConsoleShell - renders notifications to the terminal.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;
use contracts::{ContractError, Delivery, PresentationShell, SubscriberId};
use observability::NotificationAggregator;

/// Terminal presentation shell
///
/// Prints `[HH:MM:SS] <subscriber> | <text>` per delivery and a
/// `Status: Online/Offline` line per status change. Deliveries are also
/// counted into the shared session aggregator.
pub struct ConsoleShell {
    out: Mutex<Box<dyn Write + Send>>,
    stats: Arc<Mutex<NotificationAggregator>>,
    timestamps: bool,
}

impl ConsoleShell {
    /// Shell writing to stdout
    pub fn stdout(stats: Arc<Mutex<NotificationAggregator>>, timestamps: bool) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), stats, timestamps)
    }

    pub fn with_writer(
        out: Box<dyn Write + Send>,
        stats: Arc<Mutex<NotificationAggregator>>,
        timestamps: bool,
    ) -> Self {
        Self {
            out: Mutex::new(out),
            stats,
            timestamps,
        }
    }

    fn out(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Print a line of session output (status tables, help, errors)
    pub fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut out = self.out();
        writeln!(out, "{line}")?;
        out.flush()
    }

    fn prefix(&self, subscriber: &SubscriberId) -> String {
        if self.timestamps {
            format!("[{}] {} | ", Local::now().format("%H:%M:%S"), subscriber)
        } else {
            format!("{} | ", subscriber)
        }
    }
}

impl PresentationShell for ConsoleShell {
    fn on_delivered(&self, delivery: &Delivery) -> Result<(), ContractError> {
        let line = format!("{}{}", self.prefix(&delivery.subscriber), delivery.text());
        self.write_line(&line)
            .map_err(|e| ContractError::delivery(delivery.subscriber.as_str(), e.to_string()))?;

        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_delivery(delivery.kind);
        Ok(())
    }

    fn on_status_changed(&self, subscriber: &SubscriberId, online: bool) {
        let status = if online { "Online" } else { "Offline" };
        let line = format!("{}Status: {}", self.prefix(subscriber), status);
        if let Err(e) = self.write_line(&line) {
            tracing::warn!(subscriber = %subscriber, error = %e, "Failed to render status");
        }
    }
}

/// In-memory writer whose contents stay readable after being boxed
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
