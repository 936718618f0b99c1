//! Configuration module for chatnotify.
//!
//! This module wires together the data models, the notification list and the
//! loading/validation helpers used throughout the crate.
//!
//! Example:
//! use chatnotify::config::{Config, load_from_path};
//!
//! let cfg = load_from_path("config/notifications.json")?;

pub mod list;
pub mod loader;
pub mod models;

// Re-export core data models
pub use list::{IDENTITY_INDEX, IDENTITY_TRIGGER_COUNT, NotificationList};
pub use models::{
    CheckOwnMode, Config, EphemeralMessage, NotifMode, Notification, ResponseKind,
    ResponseMessage, RestyleMode, SenderDetectionMode, Sound, SoundSource, SourceConfig,
    StyleTarget, StyleTargetKind, TextStyle, Trigger, TriggerKind,
};

// Re-export loader utilities
pub use loader::{
    generate_schema, load_from_path, load_from_path_async, load_from_reader, load_from_str,
    validate_config, write_schema_to_writer,
};
