//! BroadcastReport - Dispatcher output
//!
//! Diagnostic outcome of one broadcast. Broadcast itself never fails.

use serde::{Deserialize, Serialize};

use crate::SubscriberId;

/// Per-broadcast diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastReport {
    /// Receive attempts (one per registered subscriber)
    pub attempted: usize,
    /// Attempts that returned Ok
    pub delivered: usize,
    /// Subscribers whose receive failed or panicked
    pub failures: Vec<SubscriberId>,
}

impl BroadcastReport {
    /// Number of failed attempts
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every attempt succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
