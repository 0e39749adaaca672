//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Delivery Model
//! - A message is an opaque string at this layer
//! - Subscribers render through a `PresentationShell`, tagged real-time or from-storage

mod blueprint;
mod delivery;
mod error;
mod report;
mod shell;
mod subscriber;
mod subscriber_id;

pub use blueprint::*;
pub use delivery::{Delivery, DeliveryKind};
pub use error::*;
pub use report::BroadcastReport;
pub use shell::PresentationShell;
pub use subscriber::Subscriber;
pub use subscriber_id::SubscriberId;
