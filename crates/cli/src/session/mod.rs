//! Interactive notification session.

mod command;
mod console;
mod runner;
mod stats;

pub use command::HELP;
pub use console::ConsoleShell;
pub use runner::{Flow, Session};
