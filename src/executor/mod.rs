#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

/*!
Executor module for chatnotify.

This module wires together:
- `actions`: emits output commands to the host (or only logs them in dry-run mode)
- `runtime`: host event decoding, the tick clock and pipeline dispatch

Typical usage:
- Construct a `Runtime` with a loaded `Config`.
- Call `Runtime::run_event` with each incoming JSON host event, and `Runtime::tick` once per host tick.

Example:
```no_run
use chatnotify::config::Config;
use chatnotify::executor::Runtime;
use serde_json::json;

let cfg: Config = Default::default();
let mut rt = Runtime::new(cfg, true); // dry-run mode
let event = json!({"type": "message", "text": "Hello"});
// rt.run_event(&event)?;
// rt.tick()?;
```

Public re-exports:
- `OutputExecutor`: writes output commands as JSON lines (respecting dry-run).
- `Runtime`: routes host events through the pipeline and delivers responses.
- `HostEvent`: the host events the runtime understands.
*/

pub mod actions;
pub mod runtime;

// Re-exports for convenient access from `chatnotify::executor::*`
pub use actions::OutputExecutor;
pub use runtime::{HostEvent, Runtime};
