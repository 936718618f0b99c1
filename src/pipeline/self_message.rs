//! Recognising echoes of messages the local user just sent.
//!
//! Outgoing text cannot be tagged with a sender on every transport, so recently sent text
//! is remembered for a short window and matched against incoming messages. An incoming
//! message counts as "own" when it contains a remembered text preceded by one of the
//! user's names (the identity notification's triggers); the remembered entry is consumed
//! so a single send can only claim a single echo.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::{Notification, SenderDetectionMode};
use crate::matching::trigger::any_match;

/// How long an outgoing text stays eligible for correlation.
pub const ECHO_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct SentEntry {
    expiry: Instant,
    text: String,
}

#[derive(Debug, Default)]
pub struct SelfMessageCorrelator {
    entries: VecDeque<SentEntry>,
}

impl SelfMessageCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of remembered outgoing texts (expired ones included until the next purge).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remember a chat message or command sent by the local user.
    ///
    /// The longest matching prefix is stripped first. Commands are normalised to a leading
    /// `/`; a command matching no prefix never echoes into chat and is ignored.
    pub fn record_outgoing(&mut self, text: &str, is_command: bool, now: Instant, prefixes: &[String]) {
        self.purge(now);

        let normalised;
        let text = if is_command && !text.starts_with('/') {
            normalised = format!("/{text}");
            normalised.as_str()
        } else {
            text
        };

        let stripped = match longest_prefix(text, prefixes) {
            Some(prefix) => &text[prefix.len()..],
            None if is_command => {
                trace!(target: "chatnotify::pipeline", %text, "Command without chat prefix; not recorded");
                return;
            }
            None => text,
        };
        let stripped = stripped.trim();
        if stripped.is_empty() {
            return;
        }

        debug!(target: "chatnotify::pipeline", text = %stripped, "Recorded outgoing message");
        self.entries.push_back(SentEntry {
            expiry: now + ECHO_WINDOW,
            text: stripped.to_string(),
        });
    }

    /// Decide whether `incoming` is an echo of the local user's own message.
    ///
    /// `transport_hint` is the sender flag supplied by the transport, used only in
    /// [`SenderDetectionMode::Combined`].
    pub fn classify(
        &mut self,
        incoming: &str,
        now: Instant,
        mode: SenderDetectionMode,
        identity: Option<&Notification>,
        transport_hint: bool,
    ) -> bool {
        self.purge(now);
        let sent_match = self.consume_sent_match(incoming, identity);
        match mode {
            SenderDetectionMode::SentMatch => sent_match,
            SenderDetectionMode::Combined => sent_match || transport_hint,
        }
    }

    /// Drop every entry whose expiry lies before `now`.
    pub fn purge(&mut self, now: Instant) {
        self.entries.retain(|e| e.expiry >= now);
    }

    fn consume_sent_match(&mut self, incoming: &str, identity: Option<&Notification>) -> bool {
        let Some(identity) = identity else {
            return false;
        };
        let position = self.entries.iter().position(|entry| {
            incoming
                .rfind(entry.text.as_str())
                .is_some_and(|at| any_match(&identity.triggers, &incoming[..at], None))
        });
        match position {
            Some(i) => {
                if let Some(entry) = self.entries.remove(i) {
                    debug!(target: "chatnotify::pipeline", text = %entry.text, "Incoming message is an own echo");
                }
                true
            }
            None => false,
        }
    }
}

fn longest_prefix<'p>(text: &str, prefixes: &'p [String]) -> Option<&'p str> {
    prefixes
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty() && text.starts_with(p))
        .max_by_key(|p| p.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> Vec<String> {
        vec!["/tm".into(), "/teammsg".into(), "/m".into(), "/me".into()]
    }

    fn identity() -> Notification {
        Notification::identity("Steve", "Captain")
    }

    fn classify(c: &mut SelfMessageCorrelator, text: &str, at: Instant) -> bool {
        c.classify(text, at, SenderDetectionMode::SentMatch, Some(&identity()), false)
    }

    #[test]
    fn consumes_echo_within_window() {
        let t0 = Instant::now();
        let mut c = SelfMessageCorrelator::new();
        c.record_outgoing("hello", false, t0, &prefixes());
        assert_eq!(c.len(), 1);

        assert!(classify(&mut c, "<Steve> hello", t0 + Duration::from_millis(4900)));
        assert!(c.is_empty());
        assert!(!classify(&mut c, "<Steve> hello", t0 + Duration::from_millis(4950)));
    }

    #[test]
    fn expired_entries_do_not_match() {
        let t0 = Instant::now();
        let mut c = SelfMessageCorrelator::new();
        c.record_outgoing("hello", false, t0, &prefixes());
        assert!(!classify(&mut c, "<Steve> hello", t0 + Duration::from_millis(5100)));
        assert!(c.is_empty());
    }

    #[test]
    fn requires_identity_before_text() {
        let t0 = Instant::now();
        let mut c = SelfMessageCorrelator::new();
        c.record_outgoing("hello", false, t0, &prefixes());
        assert!(!classify(&mut c, "<Alex> hello", t0));
        // Entry is still there for the real echo.
        assert!(classify(&mut c, "[Captain] hello", t0));
    }

    #[test]
    fn strips_longest_prefix() {
        let t0 = Instant::now();
        let mut c = SelfMessageCorrelator::new();
        c.record_outgoing("teammsg hello team", true, t0, &prefixes());
        assert!(classify(&mut c, "[Team] <Steve> hello team", t0));

        c.record_outgoing("/me waves", false, t0, &prefixes());
        assert!(classify(&mut c, "* Steve waves", t0));
    }

    #[test]
    fn commands_without_prefix_and_blank_text_are_ignored() {
        let t0 = Instant::now();
        let mut c = SelfMessageCorrelator::new();
        c.record_outgoing("gamemode creative", true, t0, &prefixes());
        c.record_outgoing("/tm   ", false, t0, &prefixes());
        c.record_outgoing("   ", false, t0, &prefixes());
        assert!(c.is_empty());
    }

    #[test]
    fn combined_mode_uses_transport_hint() {
        let t0 = Instant::now();
        let mut c = SelfMessageCorrelator::new();
        assert!(c.classify("<Steve> hi", t0, SenderDetectionMode::Combined, Some(&identity()), true));
        assert!(!c.classify("<Steve> hi", t0, SenderDetectionMode::SentMatch, Some(&identity()), true));
    }

    #[test]
    fn combined_mode_still_consumes() {
        let t0 = Instant::now();
        let mut c = SelfMessageCorrelator::new();
        c.record_outgoing("hi", false, t0, &prefixes());
        assert!(c.classify("<Steve> hi", t0, SenderDetectionMode::Combined, Some(&identity()), true));
        assert!(c.is_empty());
    }

    #[test]
    fn without_record_nothing_is_own() {
        let mut c = SelfMessageCorrelator::new();
        assert!(!classify(&mut c, "<Steve> hello", Instant::now()));
        assert!(!c.classify("<Steve> hello", Instant::now(), SenderDetectionMode::SentMatch, None, false));
    }
}
