//! Session runner: wires the dispatcher to the console and executes commands.

use std::sync::{Arc, Mutex, PoisonError};

use contracts::{NotifierBlueprint, PresentationShell, SubscriberConfig};
use dispatcher::{create_dispatcher, create_subscriber, Dispatcher};
use observability::NotificationAggregator;
use tracing::{info, instrument};

use super::command::{ShellCommand, HELP};
use super::console::ConsoleShell;
use super::stats::SessionStats;
use crate::error::{CliError, Result};

/// Whether the session keeps reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive notification session
pub struct Session {
    blueprint: NotifierBlueprint,
    dispatcher: Dispatcher,
    console: Arc<ConsoleShell>,
    stats: Arc<Mutex<NotificationAggregator>>,
}

impl Session {
    /// Build the dispatcher and subscribers described by `blueprint`
    #[instrument(
        name = "session_new",
        skip_all,
        fields(subscribers = blueprint.subscribers.len(), events = blueprint.events.len())
    )]
    pub fn new(
        blueprint: NotifierBlueprint,
        console: Arc<ConsoleShell>,
        stats: Arc<Mutex<NotificationAggregator>>,
    ) -> Result<Self> {
        let shell: Arc<dyn PresentationShell> = console.clone();
        let dispatcher = create_dispatcher(blueprint.subscribers.clone(), shell)?;

        info!(subscribers = dispatcher.len(), "Session ready");

        Ok(Self {
            blueprint,
            dispatcher,
            console,
            stats,
        })
    }

    /// Parse and execute one input line
    pub fn execute_line(&self, line: &str) -> Result<Flow> {
        match ShellCommand::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Flow::Continue),
        }
    }

    /// Execute one command
    pub fn execute(&self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Toggle(id) => {
                self.dispatcher.toggle(&id)?;
            }
            ShellCommand::Online(id) => self.dispatcher.set_online(&id, true)?,
            ShellCommand::Offline(id) => self.dispatcher.set_online(&id, false)?,
            ShellCommand::Trigger(name) => {
                let event = self
                    .blueprint
                    .event(&name)
                    .ok_or_else(|| CliError::unknown_event(&name))?;
                let description = event.description.clone();
                self.raise(&description);
            }
            ShellCommand::Event(description) => self.raise(&description),
            ShellCommand::Broadcast(message) => {
                let report = self.dispatcher.broadcast(&message);
                self.record(&report);
            }
            ShellCommand::Register { id, online } => {
                let shell: Arc<dyn PresentationShell> = self.console.clone();
                let subscriber = create_subscriber(&SubscriberConfig::admin(id, online), shell)?;
                self.dispatcher.register(subscriber)?;
            }
            ShellCommand::Unregister(id) => {
                if self.dispatcher.unregister(&id).is_none() {
                    self.console
                        .write_line(&format!("{id} is not registered, nothing to do"))?;
                }
            }
            ShellCommand::Status => self.print_status()?,
            ShellCommand::Pending(id) => self.print_pending(&id)?,
            ShellCommand::Help => self.console.write_line(HELP)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn raise(&self, description: &str) {
        let report = self.dispatcher.raise_event(description);
        self.record(&report);
    }

    fn record(&self, report: &contracts::BroadcastReport) {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update(report);
    }

    fn print_status(&self) -> Result<()> {
        let ids = self.dispatcher.subscriber_ids();
        if ids.is_empty() {
            self.console.write_line("No subscribers registered")?;
            return Ok(());
        }

        for id in ids {
            // Unregistered between listing and lookup
            let Some(subscriber) = self.dispatcher.get(&id) else {
                continue;
            };
            let status = if subscriber.is_online() {
                "Online"
            } else {
                "Offline"
            };
            self.console.write_line(&format!(
                "{id:<16} {status:<8} pending={}",
                subscriber.pending().len()
            ))?;
        }
        Ok(())
    }

    fn print_pending(&self, id: &str) -> Result<()> {
        let subscriber = self
            .dispatcher
            .get(id)
            .ok_or_else(|| dispatcher::DispatcherError::unknown(id))?;

        let pending = subscriber.pending();
        if pending.is_empty() {
            self.console.write_line(&format!("{id}: no stored notifications"))?;
        }
        for (idx, message) in pending.iter().enumerate() {
            self.console.write_line(&format!("{id}[{idx}]: {message}"))?;
        }
        Ok(())
    }

    /// Statistics for the end-of-session summary
    pub fn stats(&self) -> SessionStats {
        let aggregator = self
            .stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        SessionStats {
            dispatcher: self.dispatcher.metrics(),
            subscribers: self.dispatcher.len(),
            aggregator,
        }
    }
}
