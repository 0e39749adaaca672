//! Presentation shell implementations
//!
//! Contains LogShell and RecordingShell.

mod log;
mod recording;

pub use self::log::LogShell;
pub use self::recording::{RecordingShell, ShellEvent};
