//! Utilities for chatnotify.
//!
//! This module aggregates utility helpers used across the crate.
//!
//! Submodules:
//! - `interpolation`: `$N` capture placeholders in response and ephemeral texts.
//! - `keys`: key-chord resolution for `command_keys` responses.

pub mod interpolation;
pub mod keys;
