use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use chatnotify::config as cfg;
use chatnotify::executor::Runtime;
use chatnotify::sources;

/// chatnotify CLI
#[derive(Debug, Parser)]
#[command(
    name = chatnotify::PKG_NAME,
    version = chatnotify::PKG_VERSION,
    about = "Rule-driven chat notifications: reads host events as JSON lines, writes output commands as JSON lines"
)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short = 'c', long = "config", default_value = "config/notifications.json")]
    config: PathBuf,

    /// Enable dry-run mode (log output commands instead of writing them to stdout)
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Set log level (e.g., trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Print the JSON Schema for the configuration and exit
    #[arg(long = "print-schema")]
    print_schema: bool,

    /// Local user's profile name (identity trigger)
    #[arg(long = "profile-name")]
    profile_name: Option<String>,

    /// Local user's display name (identity trigger); defaults to the profile name
    #[arg(long = "display-name")]
    display_name: Option<String>,

    /// Host tick length in milliseconds (50 = 20 ticks per second)
    #[arg(long = "tick-ms", default_value_t = 50)]
    tick_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    chatnotify::init_tracing(args.log_level.as_deref());

    if args.print_schema {
        let schema = cfg::generate_schema();
        let json = serde_json::to_string_pretty(&schema)?;
        println!("{json}");
        return Ok(());
    }

    info!(
        version = chatnotify::PKG_VERSION,
        config = %args.config.display(),
        dry_run = args.dry_run,
        tick_ms = args.tick_ms,
        "Starting chatnotify"
    );

    // Load configuration
    let config = cfg::load_from_path_async(&args.config).await?;
    debug!(target: "chatnotify", "Configuration loaded successfully");

    // Create the runtime (owns the config)
    let mut runtime = Runtime::new(config, args.dry_run);
    match (&args.profile_name, &args.display_name) {
        (None, None) => {}
        (profile, display) => {
            let profile = profile.as_deref().or(display.as_deref()).unwrap_or_default();
            let display = display.as_deref().unwrap_or(profile);
            runtime.set_identity(profile, display);
        }
    }

    // Build and spawn event sources based on config
    let sources = sources::build_sources_from_config(runtime.config());
    if sources.is_empty() {
        warn!("No event sources configured; nothing to do.");
    }

    // Channel for events produced by sources
    let shutdown = CancellationToken::new();
    let (tx, mut rx) = mpsc::channel::<Value>(256);
    let handles = sources::spawn_all_sources(&sources, tx, &shutdown);

    let mut ticker = interval(Duration::from_millis(args.tick_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut sources_done = false;

    // Main loop: host events, ticks or Ctrl+C
    loop {
        tokio::select! {
            event = rx.recv(), if !sources_done => match event {
                Some(event) => {
                    if let Err(err) = runtime.run_event(&event) {
                        let err = format!("{err:#}");
                        error!(error = %err, event = %event, "Failed to handle event");
                    }
                }
                None => {
                    sources_done = true;
                    info!(pending = runtime.pending_responses(), "All sources finished");
                }
            },
            _ = ticker.tick() => {
                if let Err(err) = runtime.tick() {
                    let err = format!("{err:#}");
                    error!(error = %err, tick = runtime.current_tick(), "Failed to deliver responses");
                }
                if sources_done && runtime.pending_responses() == 0 {
                    break;
                }
            }
            res = &mut ctrl_c => {
                if let Err(err) = res {
                    warn!(error = %err, "Failed to listen for Ctrl+C");
                }
                info!(pending = runtime.pending_responses(), "Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    shutdown.cancel();
    for handle in handles {
        if timeout(Duration::from_secs(1), handle).await.is_err() {
            debug!("Source task did not stop in time");
        }
    }

    info!("chatnotify exited");
    Ok(())
}
