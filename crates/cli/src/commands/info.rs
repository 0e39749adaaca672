//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::NotifierBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    subscribers: Vec<SubscriberInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<EventInfo>,
}

#[derive(Serialize)]
struct SubscriberInfo {
    id: String,
    kind: String,
    online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pending_capacity: Option<usize>,
    overflow: String,
}

#[derive(Serialize)]
struct EventInfo {
    name: String,
    description: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &NotifierBlueprint) -> ConfigInfo {
    let subscribers = blueprint
        .subscribers
        .iter()
        .map(|s| SubscriberInfo {
            id: s.id.clone(),
            kind: format!("{:?}", s.kind),
            online: s.online,
            pending_capacity: s.pending_capacity,
            overflow: format!("{:?}", s.overflow),
        })
        .collect();

    let events = blueprint
        .events
        .iter()
        .map(|e| EventInfo {
            name: e.name.clone(),
            description: e.description.clone(),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        subscribers,
        events,
    }
}

fn print_config_info(blueprint: &NotifierBlueprint) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Notifier Configuration                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Version: {:?}", blueprint.version);

    println!("\nSubscribers ({})", blueprint.subscribers.len());
    for (i, subscriber) in blueprint.subscribers.iter().enumerate() {
        let is_last = i == blueprint.subscribers.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let status = if subscriber.online { "online" } else { "offline" };
        let queue = match subscriber.pending_capacity {
            Some(capacity) => format!("queue {} ({:?})", capacity, subscriber.overflow),
            None => "queue unbounded".to_string(),
        };

        println!(
            "   {} {} ({:?}, {}, {})",
            prefix, subscriber.id, subscriber.kind, status, queue
        );
    }

    if !blueprint.events.is_empty() {
        println!("\nEvents ({})", blueprint.events.len());
        for (i, event) in blueprint.events.iter().enumerate() {
            let is_last = i == blueprint.events.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!("   {} {}: {}", prefix, event.name, event.description);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_from_demo() {
        let info = build_config_info(&NotifierBlueprint::demo());
        assert_eq!(info.subscribers.len(), 2);
        assert_eq!(info.subscribers[0].id, "hamid");
        assert!(info.subscribers[0].online);
        assert_eq!(info.events.len(), 2);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["subscribers"][1]["online"], false);
        assert!(json["subscribers"][1].get("pending_capacity").is_none());
    }
}
