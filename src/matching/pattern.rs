//! Lazily compiled, cached patterns.
//!
//! Triggers and style targets keep their pattern source as a plain `String` so the
//! configuration layer can edit it freely. The compiled form lives next to it in a
//! [`PatternCache`] that remembers which source it was built from; reading the cache with a
//! different source recompiles. Compile failures are logged once per distinct source and
//! then cached as "no pattern", so a bad rule stays inert without spamming the log on every
//! message.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{trace, warn};

/// How a pattern source should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// Literal text, matched case-insensitively (Unicode simple case folding).
    Literal,
    /// A regular expression, used as written.
    Regex,
}

/// Error raised when a pattern source cannot be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern '{pattern}': {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Compile `source` according to `mode`.
pub fn compile(source: &str, mode: PatternMode) -> Result<Regex, PatternError> {
    let built = match mode {
        PatternMode::Literal => RegexBuilder::new(&regex::escape(source))
            .case_insensitive(true)
            .build(),
        PatternMode::Regex => Regex::new(source),
    };
    built.map_err(|source_err| PatternError::Invalid {
        pattern: source.to_string(),
        source: source_err,
    })
}

#[derive(Clone)]
struct Compiled {
    source: String,
    mode: PatternMode,
    regex: Option<Regex>,
}

/// Cached derived value: `(source, mode) -> Option<Regex>`.
#[derive(Default)]
pub struct PatternCache {
    slot: Mutex<Option<Compiled>>,
}

impl PatternCache {
    /// Return the compiled pattern for `source`, recompiling only when the source or mode
    /// differs from the cached one. `None` means the source does not compile.
    pub fn get(&self, source: &str, mode: PatternMode) -> Option<Regex> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            if cached.mode == mode && cached.source == source {
                return cached.regex.clone();
            }
        }

        trace!(target: "chatnotify::matching", pattern = %source, ?mode, "Compiling pattern");
        let regex = match compile(source, mode) {
            Ok(regex) => Some(regex),
            Err(err) => {
                warn!(
                    target: "chatnotify::matching",
                    error = %err,
                    "Pattern does not compile; rule will never match until edited"
                );
                None
            }
        };
        *slot = Some(Compiled {
            source: source.to_string(),
            mode,
            regex: regex.clone(),
        });
        regex
    }
}

impl Clone for PatternCache {
    fn clone(&self) -> Self {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        Self {
            slot: Mutex::new(slot.clone()),
        }
    }
}

impl fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(c) => f
                .debug_struct("PatternCache")
                .field("source", &c.source)
                .field("valid", &c.regex.is_some())
                .finish(),
            None => f.write_str("PatternCache(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_mode_escapes_and_ignores_case() {
        let re = compile("a.b (x)", PatternMode::Literal).unwrap();
        assert!(re.is_match("see A.B (X) here"));
        assert!(!re.is_match("aXb (x)"));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let err = compile("(unclosed", PatternMode::Regex).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn cache_recompiles_when_source_changes() {
        let cache = PatternCache::default();
        let first = cache.get("foo", PatternMode::Regex).unwrap();
        assert!(first.is_match("foo"));

        let second = cache.get("bar", PatternMode::Regex).unwrap();
        assert!(second.is_match("bar"));
        assert!(!second.is_match("foo"));
    }

    #[test]
    fn cache_remembers_invalid_source() {
        let cache = PatternCache::default();
        assert!(cache.get("[", PatternMode::Regex).is_none());
        assert!(cache.get("[", PatternMode::Regex).is_none());
        // Same text as a literal compiles fine.
        assert!(cache.get("[", PatternMode::Literal).is_some());
    }

    #[test]
    fn clone_keeps_compiled_state() {
        let cache = PatternCache::default();
        cache.get("x+", PatternMode::Regex);
        let copy = cache.clone();
        assert!(format!("{copy:?}").contains("x+"));
        assert_eq!(format!("{:?}", PatternCache::default()), "PatternCache(empty)");
    }
}
