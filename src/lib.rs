#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! chatnotify: a rule-driven chat notification engine.
//!
//! Incoming chat messages are evaluated against an ordered list of notification rules;
//! activated rules restyle the message, play sounds, show ephemeral text and schedule
//! delayed responses. Most implementation details live under the internal modules:
//! - `config`: Configuration models, the notification list, loader and schema helpers.
//! - `matching`: Trigger matching, style targets and the per-notification activation decision.
//! - `pipeline`: Own-message correlation, mode policy, output commands and the response scheduler.
//! - `executor`: Host event runtime and output command executor.
//! - `sources`: Host event sources (file, stdin).
//! - `utils`: Capture interpolation and key-chord resolution.
//!
//! Use `chatnotify::prelude::*` to bring commonly used items into scope quickly.

/// Public module: configuration (models, notification list, loader, schema helpers).
pub mod config;
/// Public module: host event runtime and output executor.
pub mod executor;
/// Public module: trigger and style matching, activation decisions.
pub mod matching;
/// Public module: per-message pipeline and response scheduling.
pub mod pipeline;
/// Public module: host event sources (file, stdin).
pub mod sources;
/// Public module: utilities (capture interpolation, key chords).
pub mod utils;

/// Crate-level constants for consumers that want to inspect package metadata at runtime.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version (e.g., "0.1.0").
#[inline]
pub const fn version() -> &'static str {
    PKG_VERSION
}

/// Parse a simple level name (trace|debug|info|warn|error).
pub fn parse_level(name: &str) -> Option<tracing::Level> {
    use tracing::Level;
    match name.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize tracing (logging) with a reasonable default.
/// - `level` wins when given; otherwise `RUST_LOG` is honoured as a simple level.
/// - Falls back to `info` level.
/// - Logs go to stderr; stdout carries output commands.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init_tracing(level: Option<&str>) {
    use tracing::Level;
    use tracing_subscriber::fmt;

    let level = level
        .and_then(parse_level)
        .or_else(|| std::env::var("RUST_LOG").ok().as_deref().and_then(parse_level))
        .unwrap_or(Level::INFO);

    // Ignore the error if the global subscriber was already set.
    let _ = fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A convenient set of exports for most consumers.
///
/// Bring this into scope with:
/// `use chatnotify::prelude::*;`
pub mod prelude {
    // Common result/error handling
    pub use anyhow::{Context, Error, Result, anyhow, bail, ensure};

    // Serialization
    pub use serde::{Deserialize, Serialize};

    // Tracing macros
    pub use tracing::{debug, error, info, instrument, trace, warn};

    // Timing helpers
    pub use std::time::Duration;
    pub use tokio::time::sleep;

    pub use crate as chatnotify;

    // Frequently used types
    pub use crate::config::{Config, Notification, Trigger};
    pub use crate::executor::{HostEvent, Runtime};
    pub use crate::pipeline::{ActivationPipeline, IncomingMessage, OutputCommand};

    // Frequently used internal modules
    pub use crate::{config, executor, matching, pipeline, sources, utils};
}
