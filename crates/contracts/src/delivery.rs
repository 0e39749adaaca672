//! Delivery - what the presentation shell renders
//!
//! One `Delivery` is produced per immediate or flushed message.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SubscriberId;

/// How a message reached the subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    /// Subscriber was online when the message was broadcast
    RealTime,
    /// Message was queued while offline and flushed on reconnect
    FromStorage,
}

impl DeliveryKind {
    /// Prefix prepended to the message when rendered
    pub fn prefix(self) -> &'static str {
        match self {
            Self::RealTime => "Real-time: ",
            Self::FromStorage => "Delivered from storage: ",
        }
    }

    /// Short label for logs and metric labels
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RealTime => "real_time",
            Self::FromStorage => "from_storage",
        }
    }
}

impl fmt::Display for DeliveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message delivered to one subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// Receiving subscriber
    pub subscriber: SubscriberId,
    /// Immediate or flushed
    pub kind: DeliveryKind,
    /// Raw broadcast message
    pub message: String,
}

impl Delivery {
    pub fn real_time(subscriber: SubscriberId, message: impl Into<String>) -> Self {
        Self {
            subscriber,
            kind: DeliveryKind::RealTime,
            message: message.into(),
        }
    }

    pub fn from_storage(subscriber: SubscriberId, message: impl Into<String>) -> Self {
        Self {
            subscriber,
            kind: DeliveryKind::FromStorage,
            message: message.into(),
        }
    }

    /// Rendered text, e.g. `"Real-time: New event: X ready"`
    pub fn text(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_time_text() {
        let d = Delivery::real_time("b".into(), "New event: X ready");
        assert_eq!(d.text(), "Real-time: New event: X ready");
    }

    #[test]
    fn test_from_storage_text() {
        let d = Delivery::from_storage("a".into(), "New event: X ready");
        assert_eq!(d.text(), "Delivered from storage: New event: X ready");
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&DeliveryKind::FromStorage).unwrap();
        assert_eq!(json, "\"from_storage\"");
    }
}
