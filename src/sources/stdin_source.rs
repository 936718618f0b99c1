//! Stdin event source.
//!
//! Reads newline-delimited JSON host events from standard input (NDJSON style).
//!
//! Behavior:
//! - Each non-empty line is trimmed and parsed as JSON using `serde_json::from_str`.
//! - Successfully parsed values are forwarded through the event channel.
//! - Malformed JSON lines are logged with `warn!` and ignored; reading continues.
//! - EOF, a closed channel or a cancelled shutdown token ends the task.
//!
//! Example:
//!     echo '{"type":"message","text":"hello Steve"}' | chatnotify --config notifications.json

use serde_json::Value;
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc::Sender,
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace, warn};

use super::EventSource;

/// Source that reads newline-delimited JSON events from stdin.
#[derive(Debug, Clone, Default)]
pub struct StdinSource;

impl StdinSource {
    /// Construct a new `StdinSource`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for StdinSource {
    fn name(&self) -> &'static str {
        "stdin"
    }

    fn start(&self, sender: Sender<Value>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(target: "chatnotify::sources", "StdinSource task started (reading lines)");
            forward_lines(BufReader::new(io::stdin()), sender, shutdown).await;
            trace!(target: "chatnotify::sources", "StdinSource task ended");
        })
    }
}

/// Forward each JSON line of `reader` until EOF, a closed channel or shutdown.
async fn forward_lines<R>(mut reader: R, sender: Sender<Value>, shutdown: CancellationToken)
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let read = tokio::select! {
            _ = shutdown.cancelled() => {
                info!(target: "chatnotify::sources", "Shutdown requested; StdinSource exiting");
                break;
            }
            read = reader.read_line(&mut line) => read,
        };
        match read {
            Ok(0) => {
                info!(target: "chatnotify::sources", "EOF on stdin; StdinSource exiting");
                break;
            }
            Ok(_) => {
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Value>(raw) {
                    Ok(val) => {
                        trace!(target: "chatnotify::sources", "Parsed JSON from stdin line");
                        if let Err(e) = sender.send(val).await {
                            error!(
                                target: "chatnotify::sources",
                                error = %e,
                                "Channel closed while sending stdin event; terminating task"
                            );
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(
                            target: "chatnotify::sources",
                            error = %e,
                            line = raw,
                            "Failed to parse stdin JSON line"
                        );
                    }
                }
            }
            Err(e) => {
                warn!(
                    target: "chatnotify::sources",
                    error = %e,
                    "Error reading from stdin; terminating task"
                );
                break;
            }
        }
    }
}
