//! Session command parsing.
//!
//! One command per line, e.g. `toggle mudassir` or `event Server restarted`.

use crate::error::{CliError, Result};

/// A command issued by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Flip a subscriber's online flag
    Toggle(String),
    /// Force a subscriber online (flushes its queue)
    Online(String),
    /// Force a subscriber offline
    Offline(String),
    /// Raise a predefined event by name
    Trigger(String),
    /// Raise an ad-hoc event: broadcasts "New event: <text>"
    Event(String),
    /// Broadcast raw text
    Broadcast(String),
    /// Register a new admin
    Register { id: String, online: bool },
    /// Remove a subscriber
    Unregister(String),
    /// Print every subscriber's status
    Status,
    /// Print a subscriber's pending queue
    Pending(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  toggle <id>               flip online/offline
  online <id>               go online (delivers stored notifications)
  offline <id>              go offline
  trigger <event>           raise a configured event
  event <text>              raise an ad-hoc event
  broadcast <text>          broadcast raw text
  register <id> [online]    add an admin (offline unless 'online')
  unregister <id>           remove a subscriber
  status                    list subscribers
  pending <id>              show stored notifications
  help                      show this help
  quit                      end the session";

impl ShellCommand {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let need_arg = |what: &str| -> Result<String> {
            if rest.is_empty() {
                Err(CliError::invalid_command(line, format!("missing {what}")))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "toggle" => Self::Toggle(need_arg("subscriber id")?),
            "online" => Self::Online(need_arg("subscriber id")?),
            "offline" => Self::Offline(need_arg("subscriber id")?),
            "trigger" => Self::Trigger(need_arg("event name")?),
            "event" => Self::Event(need_arg("event description")?),
            "broadcast" => Self::Broadcast(need_arg("message")?),
            "register" => Self::parse_register(line, rest)?,
            "unregister" => Self::Unregister(need_arg("subscriber id")?),
            "status" => Self::Status,
            "pending" => Self::Pending(need_arg("subscriber id")?),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(CliError::invalid_command(
                    line,
                    format!("unknown command '{other}', try 'help'"),
                ))
            }
        };

        Ok(Some(command))
    }

    fn parse_register(line: &str, rest: &str) -> Result<Self> {
        let mut parts = rest.split_whitespace();
        let id = parts
            .next()
            .ok_or_else(|| CliError::invalid_command(line, "missing subscriber id"))?;

        let online = match parts.next() {
            None | Some("offline") => false,
            Some("online") => true,
            Some(other) => {
                return Err(CliError::invalid_command(
                    line,
                    format!("expected 'online' or 'offline', got '{other}'"),
                ))
            }
        };

        if parts.next().is_some() {
            return Err(CliError::invalid_command(line, "too many arguments"));
        }

        Ok(Self::Register {
            id: id.to_string(),
            online,
        })
    }
}
