//! Tick-driven delivery of delayed response messages.
//!
//! Pending responses are keyed by `(fire_tick, sequence)` in a `BTreeMap`, so draining
//! everything due is a single `split_off` and equal fire ticks keep the order in which they
//! were scheduled.

use std::collections::BTreeMap;
use std::mem;

use tracing::{debug, info, warn};

use crate::config::{ResponseKind, ResponseMessage};
use crate::utils::keys::{KeyResolver, resolve_chord};

use super::output::{OutgoingKind, OutputCommand};

/// Pending responses beyond this count are suspicious (a rule firing on its own output).
const PENDING_WARN_THRESHOLD: usize = 256;

/// Where a scheduled response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseContext {
    pub notification_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingResponse {
    kind: ResponseKind,
    /// Final text for chat/commands; raw binding pair for key chords.
    text: String,
    context: ResponseContext,
}

/// A response whose fire tick has been reached.
#[derive(Debug, Clone, PartialEq)]
pub struct DueResponse {
    pub fire_tick: u64,
    pub context: ResponseContext,
    pub command: OutputCommand,
}

#[derive(Debug, Default)]
pub struct ResponseScheduler {
    pending: BTreeMap<(u64, u64), PendingResponse>,
    next_seq: u64,
}

impl ResponseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue `response` with its text already resolved; returns the fire tick.
    pub fn schedule(
        &mut self,
        response: &ResponseMessage,
        text: String,
        context: ResponseContext,
        current_tick: u64,
    ) -> u64 {
        let fire_tick = current_tick.saturating_add(u64::from(response.delay_ticks));
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(
            (fire_tick, seq),
            PendingResponse {
                kind: response.kind,
                text,
                context,
            },
        );
        debug!(
            target: "chatnotify::scheduler",
            fire_tick, kind = ?response.kind, pending = self.pending.len(),
            "Scheduled response"
        );
        if self.pending.len() == PENDING_WARN_THRESHOLD {
            warn!(
                target: "chatnotify::scheduler",
                pending = self.pending.len(),
                "Unusually many pending responses; check for rules reacting to their own responses"
            );
        }
        fire_tick
    }

    /// Remove and return every response due at `current_tick`, ascending by fire tick,
    /// ties in schedule order. Key chords are resolved now, with the current bindings.
    pub fn advance(&mut self, current_tick: u64, keys: &dyn KeyResolver) -> Vec<DueResponse> {
        let later = match current_tick.checked_add(1) {
            Some(next) => self.pending.split_off(&(next, 0)),
            None => BTreeMap::new(),
        };
        let due = mem::replace(&mut self.pending, later);

        due.into_iter()
            .filter_map(|((fire_tick, _), response)| {
                let command = match response.kind {
                    ResponseKind::Chat => OutputCommand::SendOutgoing {
                        kind: OutgoingKind::Chat,
                        text: response.text,
                    },
                    ResponseKind::Command => OutputCommand::SendOutgoing {
                        kind: OutgoingKind::Command,
                        text: response.text.trim_start_matches('/').to_string(),
                    },
                    ResponseKind::CommandKeys => match resolve_chord(&response.text, keys) {
                        Ok(chord) => OutputCommand::PressKeys { chord },
                        Err(err) => {
                            warn!(
                                target: "chatnotify::scheduler",
                                error = %err, fire_tick,
                                "Dropping key-chord response"
                            );
                            return None;
                        }
                    },
                };
                Some(DueResponse {
                    fire_tick,
                    context: response.context,
                    command,
                })
            })
            .collect()
    }

    /// Drop every pending response without firing (session or connection reset).
    pub fn reset(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            info!(target: "chatnotify::scheduler", dropped, "Dropped pending responses on reset");
        }
        dropped
    }
}
