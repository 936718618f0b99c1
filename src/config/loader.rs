use anyhow::{Context, Result, anyhow, bail};
use schemars::{Schema, schema_for};
use serde_valid::Validate;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

use super::list::IDENTITY_TRIGGER_COUNT;
use super::models::{
    Config, EphemeralMessage, Notification, ResponseKind, SourceConfig, StyleTargetKind, Trigger,
    TriggerKind,
};
use crate::utils::interpolation::has_placeholders;
use crate::utils::keys::parse_key_pair;

/// Load configuration from a string slice.
pub fn load_from_str(s: &str) -> Result<Config> {
    let cfg: Config =
        serde_json::from_str(s).context("Failed to parse JSON config string into Config")?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Load configuration from any reader (e.g., a file).
pub fn load_from_reader<R: Read>(reader: R) -> Result<Config> {
    let cfg: Config =
        serde_json::from_reader(reader).context("Failed to parse JSON config from reader")?;
    validate_config(&cfg)?;
    Ok(cfg)
}

/// Load configuration from a file path synchronously.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref)
        .with_context(|| format!("Failed to open config file {}", path_ref.display()))?;
    let cfg = load_from_reader(file)
        .with_context(|| format!("Invalid config file {}", path_ref.display()))?;
    debug!(target: "chatnotify::config", "Loaded config from {}", path_ref.display());
    Ok(cfg)
}

/// Load configuration from a file path asynchronously (Tokio).
pub async fn load_from_path_async<P: AsRef<Path>>(path: P) -> Result<Config> {
    use tokio::fs;
    let path_ref = path.as_ref();
    let bytes = fs::read(path_ref)
        .await
        .with_context(|| format!("Failed to read config file {}", path_ref.display()))?;
    let cfg: Config = serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse JSON config from {}", path_ref.display()))?;
    validate_config(&cfg)?;
    debug!(target: "chatnotify::config", "Loaded config from {}", path_ref.display());
    Ok(cfg)
}

/// Generate the JSON Schema for the Config model (for external validation or tooling).
pub fn generate_schema() -> Schema {
    schema_for!(Config)
}

/// Write the JSON Schema for the Config model to any writer (pretty-printed).
pub fn write_schema_to_writer<W: Write>(mut writer: W) -> Result<()> {
    let schema = generate_schema();
    let json = serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?;
    writer
        .write_all(json.as_bytes())
        .context("Failed to write schema to writer")?;
    Ok(())
}

/// Perform sanity checks the type system cannot express.
/// - The identity notification sits at index 0 with exactly two triggers.
/// - Sounds are in range, colours are `#RRGGBB`, key chords are well formed.
/// - Broken regexes only produce a warning: they never match at runtime.
/// - Regex patterns are compiled into their caches here.
pub fn validate_config(cfg: &Config) -> Result<()> {
    if !cfg.notifications.identity_is_valid() {
        bail!(
            "The first notification must be the identity notification with exactly {} triggers",
            IDENTITY_TRIGGER_COUNT
        );
    }

    if cfg.prefixes.iter().any(|p| p.trim().is_empty()) {
        bail!("Command prefixes must not be blank");
    }

    for source in &cfg.sources {
        if let SourceConfig::File { path, poll_ms, .. } = source {
            if path.trim().is_empty() {
                bail!("File source requires a non-empty path");
            }
            if *poll_ms == Some(0) {
                bail!("File source '{}' has a zero poll interval", path);
            }
        }
    }

    for (index, notification) in cfg.notifications.iter().enumerate() {
        validate_notification(index, notification)
            .with_context(|| format!("Invalid notification at index {}", index))?;
    }

    Ok(())
}

fn validate_notification(index: usize, n: &Notification) -> Result<()> {
    n.sound
        .validate()
        .map_err(|e| anyhow!("Invalid sound '{}': {}", n.sound.id, e))?;

    if let Some(color) = &n.text_style.color {
        if n.text_style.rgb().is_none() {
            bail!("Text colour '{}' is not in #RRGGBB form", color);
        }
    }

    for (i, response) in n.response_messages.iter().enumerate() {
        if response.kind == ResponseKind::CommandKeys {
            parse_key_pair(&response.text)
                .with_context(|| format!("Invalid key chord in response message {}", i))?;
        }
    }

    let all_triggers = n
        .triggers
        .iter()
        .chain(&n.inclusion_triggers)
        .chain(&n.exclusion_triggers);
    for trigger in all_triggers {
        warm_patterns(index, trigger);
    }

    if !n.triggers.iter().any(|t| t.kind == TriggerKind::Regex) {
        let ephemerals: [&EphemeralMessage; 4] = [&n.replacement, &n.status_bar, &n.title, &n.toast];
        let texts = n
            .response_messages
            .iter()
            .filter(|r| r.kind != ResponseKind::CommandKeys)
            .map(|r| r.text.as_str())
            .chain(ephemerals.iter().map(|m| m.text.as_str()));
        for text in texts.filter(|t| has_placeholders(t)) {
            warn!(
                target: "chatnotify::config",
                index, %text,
                "Capture placeholders are only substituted for regex triggers"
            );
        }
    }

    Ok(())
}

/// Compile every regex once at load time. The pattern cache logs the failure itself and
/// remembers it, so a broken rule is reported here and never recompiled per message.
fn warm_patterns(index: usize, trigger: &Trigger) {
    if trigger.kind == TriggerKind::Regex && trigger.pattern().is_none() {
        debug!(target: "chatnotify::config", index, pattern = %trigger.text, "Trigger is inert");
    }
    let target = &trigger.style_target;
    if target.is_active() && target.kind == StyleTargetKind::Regex && target.pattern().is_none() {
        debug!(
            target: "chatnotify::config",
            index, pattern = %target.text,
            "Style target falls back to the whole match"
        );
    }
}
