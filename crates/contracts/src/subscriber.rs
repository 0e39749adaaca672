//! Subscriber trait - Dispatcher fan-out interface
//!
//! Every subscriber variant registered with a dispatcher implements this.

use crate::{ContractError, SubscriberId};

/// Capability interface of a notification subscriber
///
/// All methods take `&self`; implementations guard their own state so that
/// a dispatcher can be shared across threads.
pub trait Subscriber: Send + Sync {
    /// Identity (unique within a dispatcher)
    fn id(&self) -> &SubscriberId;

    /// Accept a broadcast message
    ///
    /// # Errors
    /// Returns a delivery error; the dispatcher contains it
    fn receive(&self, message: &str) -> Result<(), ContractError>;

    /// Set the online flag, flushing stored messages on offline → online
    fn set_online(&self, online: bool);

    /// Current online flag
    fn is_online(&self) -> bool;

    /// Flip the online flag and return the new value
    ///
    /// Must read and write the flag as one step: two concurrent toggles
    /// always leave the flag where it started.
    fn toggle_online(&self) -> bool;

    /// Messages waiting for reconnect, oldest first
    fn pending(&self) -> Vec<String> {
        Vec::new()
    }
}
