//! `run` command implementation.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use contracts::NotifierBlueprint;
use observability::NotificationAggregator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::session::{ConsoleShell, Flow, Session, HELP};

/// Execute the `run` command
pub async fn run_session(args: &RunArgs) -> Result<()> {
    let blueprint = load_blueprint(args)?;

    info!(
        subscribers = blueprint.subscribers.len(),
        events = blueprint.events.len(),
        "Configuration loaded"
    );

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let stats = Arc::new(Mutex::new(NotificationAggregator::new()));
    let console = Arc::new(ConsoleShell::stdout(stats.clone(), !args.no_timestamps));
    let session = Session::new(blueprint, console.clone(), stats)
        .context("Failed to build dispatcher")?;

    if args.exec.is_empty() {
        run_interactive(&session, &console).await?;
    } else {
        for line in &args.exec {
            if step(&session, &console, line)? == Flow::Quit {
                break;
            }
        }
    }

    session.stats().print_summary();
    info!("Notifier finished");
    Ok(())
}

fn load_blueprint(args: &RunArgs) -> Result<NotifierBlueprint> {
    if args.demo {
        info!("Using built-in demo configuration");
        return Ok(NotifierBlueprint::demo());
    }

    info!(config = %args.config.display(), "Loading configuration");
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))
}

/// Read commands from stdin until `quit`, EOF or a shutdown signal
async fn run_interactive(session: &Session, console: &ConsoleShell) -> Result<()> {
    console.write_line(HELP)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = setup_shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    info!("End of input");
                    break;
                };
                if step(session, console, &line)? == Flow::Quit {
                    break;
                }
            }
            _ = &mut shutdown => {
                warn!("Received shutdown signal, ending session...");
                break;
            }
        }
    }

    Ok(())
}

/// Execute one line; command errors are reported and the session continues
fn step(session: &Session, console: &ConsoleShell, line: &str) -> Result<Flow> {
    match session.execute_line(line) {
        Ok(flow) => Ok(flow),
        Err(CliError::Io(e)) => Err(e).context("Failed to write session output"),
        Err(e) => {
            warn!(input = line, error = %e, "Command failed");
            console.write_line(&format!("error: {e}"))?;
            Ok(Flow::Continue)
        }
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
