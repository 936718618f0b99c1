//! Key-chord resolution for `command_keys` responses.
//!
//! A key-chord response stores two input-binding identifiers joined by `-`, for example
//! `key.keyboard.f3-key.chat`. Identifiers are resolved through the current
//! [`KeyResolver`] when the response fires, so rebinding a key after the response was
//! scheduled is still honoured.

use std::collections::BTreeMap;

use thiserror::Error;

/// Binding identifier -> key name (e.g. `"key.chat" -> "T"`).
pub type KeyBindings = BTreeMap<String, String>;

/// Looks up the key currently bound to an identifier.
pub trait KeyResolver {
    fn key_name(&self, binding_id: &str) -> Option<String>;
}

impl KeyResolver for KeyBindings {
    fn key_name(&self, binding_id: &str) -> Option<String> {
        self.get(binding_id)
            .cloned()
            .or_else(|| raw_key_name(binding_id))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyChordError {
    #[error("key chord '{0}' must be two identifiers joined by '-'")]
    Malformed(String),
    #[error("no key bound to '{0}'")]
    Unbound(String),
}

/// Split `text` into its two binding identifiers.
pub fn parse_key_pair(text: &str) -> Result<(&str, &str), KeyChordError> {
    let (first, second) = text
        .split_once('-')
        .ok_or_else(|| KeyChordError::Malformed(text.to_string()))?;
    let (first, second) = (first.trim(), second.trim());
    if first.is_empty() || second.is_empty() {
        return Err(KeyChordError::Malformed(text.to_string()));
    }
    Ok((first, second))
}

/// Resolve `text` into a literal chord such as `F3+D`.
pub fn resolve_chord(text: &str, resolver: &dyn KeyResolver) -> Result<String, KeyChordError> {
    let (first, second) = parse_key_pair(text)?;
    let a = resolver
        .key_name(first)
        .ok_or_else(|| KeyChordError::Unbound(first.to_string()))?;
    let b = resolver
        .key_name(second)
        .ok_or_else(|| KeyChordError::Unbound(second.to_string()))?;
    Ok(format!("{a}+{b}"))
}

/// Physical key identifiers name themselves: `key.keyboard.left.shift` -> `LEFT_SHIFT`.
fn raw_key_name(binding_id: &str) -> Option<String> {
    let rest = binding_id
        .strip_prefix("key.keyboard.")
        .or_else(|| binding_id.strip_prefix("key.mouse."))?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.replace('.', "_").to_uppercase())
}
