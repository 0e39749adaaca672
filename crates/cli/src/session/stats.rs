//! Session statistics and end-of-run summary.

use dispatcher::DispatcherMetricsSnapshot;
use observability::NotificationAggregator;

/// Statistics from a notification session
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Dispatcher counters at the end of the session
    pub dispatcher: DispatcherMetricsSnapshot,

    /// Subscribers still registered
    pub subscribers: usize,

    /// Broadcast and delivery aggregator
    pub aggregator: NotificationAggregator,
}

impl SessionStats {
    /// Deliveries rendered by the shell (real-time plus from storage)
    pub fn rendered(&self) -> u64 {
        self.aggregator.real_time_deliveries + self.aggregator.storage_deliveries
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Session Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("Overview");
        println!("   ├─ Subscribers: {}", self.subscribers);
        println!("   ├─ Broadcasts: {}", self.dispatcher.broadcast_count);
        println!("   ├─ Receive attempts: {}", self.dispatcher.attempt_count);
        println!("   ├─ Failed receives: {}", self.dispatcher.failure_count);
        println!("   └─ Rendered notifications: {}", self.rendered());

        println!("\n{}", self.aggregator.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DeliveryKind;

    #[test]
    fn test_rendered_counts_both_kinds() {
        let mut stats = SessionStats::default();
        stats.aggregator.record_delivery(DeliveryKind::RealTime);
        stats.aggregator.record_delivery(DeliveryKind::FromStorage);
        stats.aggregator.record_delivery(DeliveryKind::FromStorage);
        assert_eq!(stats.rendered(), 3);
    }
}
