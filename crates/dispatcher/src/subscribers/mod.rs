//! Subscriber implementations
//!
//! Contains Admin (queues while offline) and LogSubscriber.

mod admin;
mod log;

pub use self::admin::Admin;
pub use self::log::LogSubscriber;
