//! PresentationShell trait - core → shell callbacks
//!
//! Defines the abstract interface of whatever renders notifications
//! (terminal, log, test recorder).

use crate::{ContractError, Delivery, SubscriberId};

/// Render side of the notification system
///
/// Callbacks are invoked synchronously while the subscriber's state lock is
/// held. Implementations must not call back into the same subscriber.
pub trait PresentationShell: Send + Sync {
    /// Render one delivered message
    ///
    /// # Errors
    /// Returns a delivery error when the message cannot be rendered
    fn on_delivered(&self, delivery: &Delivery) -> Result<(), ContractError>;

    /// Online status changed (invoked after every `set_online`)
    fn on_status_changed(&self, subscriber: &SubscriberId, online: bool);
}
