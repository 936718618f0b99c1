/*!
Event sources module (orchestration layer).

This module only defines the core `EventSource` trait and orchestration helpers
(`build_sources_from_config`, `spawn_all_sources`). Concrete implementations
live in their own files:

- `file.rs`         -> `FileSource`  (tail a newline-delimited JSON file)
- `stdin_source.rs` -> `StdinSource` (newline-delimited JSON from standard input)

Each source implementation is responsible for:
- Parsing raw input into `serde_json::Value` host events
- Pushing events via `Sender<Value>` while respecting backpressure (`send().await`)
- Logging errors and continuing (never panicking inside tasks)
- Ending cleanly when the channel closes or the shutdown token is cancelled

Adding a new source:
1. Create `src/sources/your_source.rs`
2. Implement a `YourSource` struct + `impl EventSource`
3. Expose with `pub use self::your_source::YourSource;`
4. Extend `build_sources_from_config` match on `SourceConfig`
*/

use serde_json::Value;
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{Config, SourceConfig};

pub mod file;
pub mod stdin_source;

pub use file::FileSource;
pub use stdin_source::StdinSource;

/// Trait implemented by all event sources.
///
/// A source spawns an asynchronous task that produces JSON host events and sends
/// them into the provided channel. Tasks should never panic; log and continue or
/// exit gracefully on unrecoverable errors.
pub trait EventSource: Send + Sync {
    /// Static human-readable identifier (used in logs).
    fn name(&self) -> &'static str;

    /// Start the source in the background. The task exits when the channel is
    /// closed, the input ends, or `shutdown` is cancelled.
    fn start(&self, sender: Sender<Value>, shutdown: CancellationToken) -> JoinHandle<()>;
}

/// Construct all configured sources, in config order.
pub fn build_sources_from_config(cfg: &Config) -> Vec<Box<dyn EventSource>> {
    let mut out: Vec<Box<dyn EventSource>> = Vec::new();

    for sc in &cfg.sources {
        match sc {
            SourceConfig::File {
                path,
                poll_ms,
                from_start,
            } => out.push(Box::new(FileSource::new(
                path.clone(),
                *poll_ms,
                *from_start,
            ))),

            SourceConfig::Stdin => {
                out.push(Box::new(StdinSource::new()));
            }
        }
    }

    out
}

/// Spawn every source, returning their `JoinHandle`s.
pub fn spawn_all_sources(
    sources: &[Box<dyn EventSource>],
    sender: Sender<Value>,
    shutdown: &CancellationToken,
) -> Vec<JoinHandle<()>> {
    sources
        .iter()
        .map(|src| {
            info!(
                target: "chatnotify::sources",
                source = %src.name(),
                "Starting source task"
            );
            src.start(sender.clone(), shutdown.child_token())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_sources_in_config_order() {
        let cfg: Config = serde_json::from_value(json!({
            "sources": [
                { "type": "file", "path": "events.ndjson", "from_start": true },
                { "type": "stdin" }
            ]
        }))
        .unwrap();
        let names: Vec<_> = build_sources_from_config(&cfg)
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, ["file", "stdin"]);
    }
}
