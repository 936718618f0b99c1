//! Per-message orchestration: own-message tagging, evaluation of every notification in
//! priority order, notif/restyle mode policy and side-effect commands.

use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::config::{
    Config, EphemeralMessage, NotifMode, Notification, ResponseKind, RestyleMode, TextStyle,
    TriggerKind,
};
use crate::matching::evaluator::{self, Activation};
use crate::matching::style;
use crate::matching::trigger::{MatchInfo, Span};
use crate::utils::interpolation::interpolate_captures;
use crate::utils::keys::KeyResolver;

use super::output::{EphemeralKind, OutputCommand, StyledSpan};
use super::scheduler::{DueResponse, ResponseContext, ResponseScheduler};
use super::self_message::SelfMessageCorrelator;

/// A message as extracted from the chat transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    pub text: String,
    /// Structured translation key, when the transport has one.
    #[serde(default)]
    pub key: Option<String>,
    /// Transport-provided "sent by the local user" flag.
    #[serde(default)]
    pub outgoing_echo: bool,
}

impl IncomingMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Everything the pipeline decided for one message.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub own_message: bool,
    /// Retained activations, in priority order.
    pub activations: Vec<Activation>,
    /// Immediate side effects: sounds, message disposition, ephemeral messages.
    pub commands: Vec<OutputCommand>,
    /// Number of responses handed to the scheduler.
    pub scheduled: usize,
}

/// Owns the correlator and scheduler; evaluates against a borrowed config snapshot.
#[derive(Debug, Default)]
pub struct ActivationPipeline {
    correlator: SelfMessageCorrelator,
    scheduler: ResponseScheduler,
}

impl ActivationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outgoing recording hook; call when the local user sends a message or command.
    pub fn record_outgoing(&mut self, text: &str, is_command: bool, now: Instant, config: &Config) {
        self.correlator
            .record_outgoing(text, is_command, now, &config.prefixes);
    }

    pub fn pending_responses(&self) -> usize {
        self.scheduler.len()
    }

    /// Deliver responses due at `tick`.
    pub fn advance(&mut self, tick: u64, keys: &dyn KeyResolver) -> Vec<DueResponse> {
        self.scheduler.advance(tick, keys)
    }

    /// Session/connection reset: pending responses are dropped.
    pub fn reset(&mut self) -> usize {
        self.scheduler.reset()
    }

    /// Evaluate one message against the whole notification list.
    pub fn process(
        &mut self,
        message: &IncomingMessage,
        config: &Config,
        now: Instant,
        tick: u64,
    ) -> PipelineResult {
        let text = message.text.as_str();
        let key = message.key.as_deref();
        let notifications = config.notifications.as_slice();

        let own_message = self.correlator.classify(
            text,
            now,
            config.sender_detection_mode,
            config.notifications.identity(),
            message.outgoing_echo,
        );

        let mut activations = Vec::new();
        for (index, notification) in notifications.iter().enumerate() {
            match evaluator::check(
                index,
                notification,
                text,
                key,
                own_message,
                config.check_own_messages,
            ) {
                Ok(activation) => {
                    debug!(
                        target: "chatnotify::pipeline",
                        index, trigger = activation.trigger_index,
                        "Notification activated"
                    );
                    activations.push(activation);
                }
                Err(reason) => {
                    trace!(target: "chatnotify::pipeline", index, ?reason, "Notification not activated");
                }
            }
        }
        if config.notif_mode == NotifMode::Single {
            activations.truncate(1);
        }

        let mut commands = sound_commands(config.notif_mode, &activations, notifications);

        let spans = restyle(config.restyle_mode, &activations, notifications, text, key);
        let (disposition, ephemerals) = ephemeral_commands(&activations, notifications, text, spans);
        commands.push(disposition);
        commands.extend(ephemerals);

        let scheduled = self.schedule_responses(&activations, notifications, text, tick);

        PipelineResult {
            own_message,
            activations,
            commands,
            scheduled,
        }
    }

    fn schedule_responses(
        &mut self,
        activations: &[Activation],
        notifications: &[Notification],
        text: &str,
        tick: u64,
    ) -> usize {
        let mut scheduled = 0;
        let captures = CaptureSource::first(activations, notifications);
        for activation in activations {
            let notification = &notifications[activation.notification_index];
            if !notification.response_enabled {
                continue;
            }
            for response in notification.response_messages.iter().filter(|r| r.enabled) {
                let resolved = match response.kind {
                    ResponseKind::CommandKeys => response.text.trim().to_string(),
                    ResponseKind::Chat | ResponseKind::Command => {
                        captures.resolve(&response.text, text)
                    }
                };
                if resolved.trim().is_empty() {
                    warn!(
                        target: "chatnotify::pipeline",
                        index = activation.notification_index,
                        "Skipping blank response message"
                    );
                    continue;
                }
                self.scheduler.schedule(
                    response,
                    resolved,
                    ResponseContext {
                        notification_index: activation.notification_index,
                    },
                    tick,
                );
                scheduled += 1;
            }
        }
        scheduled
    }
}

/// Captures used for `$N` placeholders: those of the first retained activation, and only
/// when its trigger is a regex. Every other case keeps templates literal.
#[derive(Clone, Copy)]
struct CaptureSource<'a> {
    info: Option<&'a MatchInfo>,
}

impl<'a> CaptureSource<'a> {
    fn first(activations: &'a [Activation], notifications: &'a [Notification]) -> Self {
        let info = activations.first().and_then(|a| {
            let trigger = &notifications[a.notification_index].triggers[a.trigger_index];
            (trigger.kind == TriggerKind::Regex).then_some(&a.match_info)
        });
        Self { info }
    }

    fn resolve(self, template: &str, text: &str) -> String {
        match self.info {
            Some(info) => interpolate_captures(template, text, info),
            None => template.to_string(),
        }
    }
}

fn sound_commands(
    mode: NotifMode,
    activations: &[Activation],
    notifications: &[Notification],
) -> Vec<OutputCommand> {
    let mut sounds = activations
        .iter()
        .map(|a| &notifications[a.notification_index].sound)
        .filter(|s| s.enabled && !s.id.trim().is_empty())
        .map(|s| OutputCommand::PlaySound {
            id: s.id.clone(),
            volume: s.volume,
            pitch: s.pitch,
            source: s.source,
        });
    match mode {
        NotifMode::All => sounds.collect(),
        NotifMode::AllSingleSound | NotifMode::Single => sounds.next().into_iter().collect(),
    }
}

fn restyle(
    mode: RestyleMode,
    activations: &[Activation],
    notifications: &[Notification],
    text: &str,
    key: Option<&str>,
) -> Vec<StyledSpan> {
    let mut layers: Vec<(Span, &TextStyle)> = Vec::new();
    match mode {
        RestyleMode::Single => {
            if let Some(first) = activations.first() {
                let style = &notifications[first.notification_index].text_style;
                if style.is_active() {
                    layers.extend(first.style_spans.iter().map(|s| (*s, style)));
                }
            }
        }
        RestyleMode::AllInstances => {
            for activation in activations {
                let notification = &notifications[activation.notification_index];
                let style = &notification.text_style;
                if !style.is_active() {
                    continue;
                }
                // The matched trigger first, then the rest of the list.
                let matched = &notification.triggers[activation.trigger_index];
                let others = notification
                    .triggers
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != activation.trigger_index)
                    .map(|(_, t)| t);
                for trigger in std::iter::once(matched).chain(others) {
                    layers.extend(
                        style::resolve_all_instances(trigger, text, key)
                            .into_iter()
                            .map(|s| (s, style)),
                    );
                }
            }
        }
    }
    merge_layers(layers)
}

/// Flatten prioritised (span, style) layers into sorted, non-overlapping styled spans.
/// Earlier layers win where they overlap later ones.
fn merge_layers(layers: Vec<(Span, &TextStyle)>) -> Vec<StyledSpan> {
    let mut covered: Vec<Span> = Vec::new();
    let mut out = Vec::new();
    for (span, style) in layers {
        let pieces = uncovered_pieces(span, &covered);
        out.extend(pieces.iter().map(|p| StyledSpan {
            start: p.start,
            end: p.end,
            style: style.clone(),
        }));
        covered.extend(pieces);
        covered.sort();
    }
    out.sort_by_key(|s| (s.start, s.end));
    out
}

/// Parts of `span` not covered by the sorted, disjoint `covered` spans.
fn uncovered_pieces(span: Span, covered: &[Span]) -> Vec<Span> {
    let mut pieces = Vec::new();
    let mut cursor = span.start;
    for c in covered {
        if c.end <= cursor {
            continue;
        }
        if c.start >= span.end {
            break;
        }
        if c.start > cursor {
            pieces.push(Span::new(cursor, c.start));
        }
        cursor = c.end;
        if cursor >= span.end {
            break;
        }
    }
    if cursor < span.end {
        pieces.push(Span::new(cursor, span.end));
    }
    pieces
}

/// The message disposition (show / replace / suppress) plus ephemeral messages.
fn ephemeral_commands(
    activations: &[Activation],
    notifications: &[Notification],
    text: &str,
    spans: Vec<StyledSpan>,
) -> (OutputCommand, Vec<OutputCommand>) {
    let mut replacement: Option<String> = None;
    let mut ephemerals = Vec::new();
    let captures = CaptureSource::first(activations, notifications);
    let resolve = |m: &EphemeralMessage| -> Option<String> {
        m.enabled.then(|| captures.resolve(&m.text, text))
    };

    for activation in activations {
        let notification = &notifications[activation.notification_index];

        if replacement.is_none() {
            replacement = resolve(&notification.replacement);
        }
        for (kind, message) in [
            (EphemeralKind::StatusBar, &notification.status_bar),
            (EphemeralKind::Title, &notification.title),
            (EphemeralKind::Toast, &notification.toast),
        ] {
            let Some(resolved) = resolve(message) else {
                continue;
            };
            let shown = if !resolved.trim().is_empty() {
                resolved
            } else if kind == EphemeralKind::Toast {
                continue;
            } else {
                text.to_string()
            };
            ephemerals.push(OutputCommand::ShowEphemeral { kind, text: shown });
        }
    }

    let disposition = match replacement {
        Some(r) if r.trim().is_empty() => OutputCommand::SuppressMessage,
        Some(r) => OutputCommand::ReplaceMessage { text: r },
        None => OutputCommand::ShowMessage {
            text: text.to_string(),
            spans,
        },
    };
    (disposition, ephemerals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CheckOwnMode, ResponseMessage, SenderDetectionMode, Sound, StyleTarget, StyleTargetKind,
        Trigger,
    };
    use crate::pipeline::output::OutgoingKind;
    use crate::utils::keys::KeyBindings;

    fn config_with(notifications: Vec<Notification>) -> Config {
        let mut cfg = Config::default();
        cfg.notifications.set_identity_names("Steve", "Steve");
        for n in notifications {
            cfg.notifications.push(n);
        }
        cfg
    }

    fn rule(trigger: &str, sound: &str) -> Notification {
        let mut n = Notification::with_triggers(vec![Trigger::normal(trigger)]);
        n.sound = Sound {
            id: sound.into(),
            ..Sound::default()
        };
        n
    }

    fn process(cfg: &Config, text: &str) -> PipelineResult {
        ActivationPipeline::new().process(&IncomingMessage::new(text), cfg, Instant::now(), 0)
    }

    fn sound_ids(result: &PipelineResult) -> Vec<String> {
        result
            .commands
            .iter()
            .filter_map(|c| match c {
                OutputCommand::PlaySound { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    fn spans_of(result: &PipelineResult) -> Vec<(usize, usize)> {
        result
            .commands
            .iter()
            .find_map(|c| match c {
                OutputCommand::ShowMessage { spans, .. } => {
                    Some(spans.iter().map(|s| (s.start, s.end)).collect())
                }
                _ => None,
            })
            .unwrap_or_default()
    }

    #[test]
    fn unmatched_message_passes_through() {
        let cfg = config_with(vec![rule("alert", "a")]);
        let result = process(&cfg, "nothing here");
        assert!(result.activations.is_empty());
        assert_eq!(
            result.commands,
            [OutputCommand::ShowMessage {
                text: "nothing here".into(),
                spans: vec![]
            }]
        );
    }

    #[test]
    fn single_mode_keeps_first_activation_only() {
        let mut first = rule("alert", "first");
        first.status_bar = EphemeralMessage::new("first!");
        first.response_enabled = true;
        first.response_messages = vec![ResponseMessage::new(ResponseKind::Chat, "one", 0)];
        let mut second = rule("alert", "second");
        second.status_bar = EphemeralMessage::new("second!");
        second.response_enabled = true;
        second.response_messages = vec![ResponseMessage::new(ResponseKind::Chat, "two", 0)];

        let mut cfg = config_with(vec![first, second]);
        cfg.notif_mode = NotifMode::Single;

        let mut pipeline = ActivationPipeline::new();
        let result = pipeline.process(&IncomingMessage::new("alert"), &cfg, Instant::now(), 0);
        assert_eq!(result.activations.len(), 1);
        assert_eq!(result.activations[0].notification_index, 1);
        assert_eq!(sound_ids(&result), ["first"]);
        assert_eq!(result.scheduled, 1);
        assert!(result.commands.contains(&OutputCommand::ShowEphemeral {
            kind: EphemeralKind::StatusBar,
            text: "first!".into()
        }));
        assert!(!result.commands.iter().any(|c| matches!(
            c,
            OutputCommand::ShowEphemeral { text, .. } if text == "second!"
        )));

        let due = pipeline.advance(0, &KeyBindings::new());
        assert_eq!(due.len(), 1);
        assert_eq!(
            due[0].command,
            OutputCommand::SendOutgoing {
                kind: OutgoingKind::Chat,
                text: "one".into()
            }
        );
    }

    #[test]
    fn sound_policy_per_notif_mode() {
        let mut silent = rule("alert", "silent");
        silent.sound.enabled = false;
        let mut cfg = config_with(vec![silent, rule("alert", "a"), rule("alert", "b")]);

        cfg.notif_mode = NotifMode::All;
        assert_eq!(sound_ids(&process(&cfg, "alert")), ["a", "b"]);

        cfg.notif_mode = NotifMode::AllSingleSound;
        let result = process(&cfg, "alert");
        assert_eq!(result.activations.len(), 3);
        assert_eq!(sound_ids(&result), ["a"]);
    }

    #[test]
    fn exclusion_suppresses_notification() {
        let mut n = rule("alert", "a");
        n.exclusion_enabled = true;
        n.exclusion_triggers = vec![Trigger::normal("ignore")];
        let cfg = config_with(vec![n]);
        let result = process(&cfg, "please ignore this alert");
        assert!(result.activations.is_empty());
        assert!(sound_ids(&result).is_empty());
    }

    #[test]
    fn restyle_single_vs_all_instances() {
        let mut cfg = config_with(vec![rule("foo", "a")]);
        cfg.restyle_mode = RestyleMode::Single;
        assert_eq!(spans_of(&process(&cfg, "foo and FOO")), [(0, 3)]);

        cfg.restyle_mode = RestyleMode::AllInstances;
        assert_eq!(spans_of(&process(&cfg, "foo and FOO")), [(0, 3), (8, 11)]);
    }

    #[test]
    fn all_instances_covers_every_trigger_of_the_notification() {
        let n = Notification::with_triggers(vec![Trigger::normal("cat"), Trigger::normal("dog")]);
        let cfg = config_with(vec![n]);
        assert_eq!(spans_of(&process(&cfg, "dog cat dog")), [(0, 3), (4, 7), (8, 11)]);
    }

    #[test]
    fn overlapping_styles_prefer_earlier_notification() {
        let mut a = rule("hello world", "a");
        a.text_style = TextStyle::color("#FF0000");
        let mut b = rule("world wide", "b");
        b.text_style = TextStyle::color("#00FF00");
        let cfg = config_with(vec![a, b]);

        let result = process(&cfg, "hello world wide");
        let spans = match &result.commands[1] {
            OutputCommand::ShowMessage { spans, .. } => spans.clone(),
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (0, 11));
        assert_eq!(spans[0].style.color.as_deref(), Some("#FF0000"));
        assert_eq!((spans[1].start, spans[1].end), (11, 16));
        assert_eq!(spans[1].style.color.as_deref(), Some("#00FF00"));
    }

    #[test]
    fn inactive_text_style_restyles_nothing() {
        let mut n = rule("foo", "a");
        n.text_style = TextStyle::default();
        let cfg = config_with(vec![n]);
        let result = process(&cfg, "foo");
        assert_eq!(result.activations.len(), 1);
        assert!(spans_of(&result).is_empty());
    }

    #[test]
    fn capturing_style_target_scenario() {
        let trigger = Trigger::regex("(foo)")
            .with_style_target(StyleTarget::new("1", StyleTargetKind::Capturing));
        let mut cfg = config_with(vec![Notification::with_triggers(vec![trigger])]);
        cfg.restyle_mode = RestyleMode::Single;
        let result = process(&cfg, "xx foo yy");
        assert_eq!(result.activations[0].style_spans, [Span::new(3, 6)]);
        assert_eq!(spans_of(&result), [(3, 6)]);
    }

    #[test]
    fn replacement_and_capture_placeholders() {
        let mut n = Notification::with_triggers(vec![Trigger::regex(r"(\w+) joined")]);
        n.replacement = EphemeralMessage::new("+ $1");
        n.title = EphemeralMessage::new("");
        n.toast = EphemeralMessage::new("  ");
        let cfg = config_with(vec![n]);

        let result = process(&cfg, "Alex joined");
        assert_eq!(
            result.commands,
            [
                OutputCommand::PlaySound {
                    id: Sound::default().id,
                    volume: 1.0,
                    pitch: 1.0,
                    source: Sound::default().source,
                },
                OutputCommand::ReplaceMessage {
                    text: "+ Alex".into()
                },
                OutputCommand::ShowEphemeral {
                    kind: EphemeralKind::Title,
                    text: "Alex joined".into()
                },
            ]
        );
    }

    #[test]
    fn blank_replacement_hides_message() {
        let mut n = rule("spam", "a");
        n.replacement = EphemeralMessage::new("");
        let cfg = config_with(vec![n]);
        assert!(process(&cfg, "spam spam").commands.contains(&OutputCommand::SuppressMessage));
    }

    #[test]
    fn placeholders_stay_literal_for_normal_triggers() {
        let mut n = rule("ping", "a");
        n.status_bar = EphemeralMessage::new("got $1");
        let cfg = config_with(vec![n]);
        assert!(process(&cfg, "ping").commands.contains(&OutputCommand::ShowEphemeral {
            kind: EphemeralKind::StatusBar,
            text: "got $1".into()
        }));
    }

    #[test]
    fn placeholders_use_captures_of_first_activation() {
        let first = Notification::with_triggers(vec![Trigger::regex("(a)")]);
        let mut second = Notification::with_triggers(vec![Trigger::regex("(b)")]);
        second.status_bar = EphemeralMessage::new("$1");
        second.response_enabled = true;
        second.response_messages = vec![ResponseMessage::new(ResponseKind::Chat, "saw $1", 0)];
        let mut cfg = config_with(vec![first, second]);
        cfg.notif_mode = NotifMode::All;

        let mut pipeline = ActivationPipeline::new();
        let result = pipeline.process(&IncomingMessage::new("ab"), &cfg, Instant::now(), 0);
        assert_eq!(result.activations.len(), 2);
        assert!(result.commands.contains(&OutputCommand::ShowEphemeral {
            kind: EphemeralKind::StatusBar,
            text: "a".into()
        }));
        let due = pipeline.advance(0, &KeyBindings::new());
        assert_eq!(
            due[0].command,
            OutputCommand::SendOutgoing {
                kind: OutgoingKind::Chat,
                text: "saw a".into()
            }
        );
    }

    #[test]
    fn placeholders_stay_literal_when_first_activation_is_not_regex() {
        let first = rule("ab", "a");
        let mut second = Notification::with_triggers(vec![Trigger::regex("(b)")]);
        second.title = EphemeralMessage::new("got $1");
        let mut cfg = config_with(vec![first, second]);
        cfg.notif_mode = NotifMode::AllSingleSound;

        let result = process(&cfg, "ab");
        assert!(result.commands.contains(&OutputCommand::ShowEphemeral {
            kind: EphemeralKind::Title,
            text: "got $1".into()
        }));
    }

    #[test]
    fn responses_keep_declaration_order_and_captures() {
        let mut n = Notification::with_triggers(vec![Trigger::regex(r"(\w+) says hi")]);
        n.response_enabled = true;
        n.response_messages = vec![
            ResponseMessage::new(ResponseKind::Chat, "hi $1", 2),
            ResponseMessage::new(ResponseKind::Command, "/wave $1", 2),
            ResponseMessage {
                enabled: false,
                ..ResponseMessage::new(ResponseKind::Chat, "disabled", 0)
            },
        ];
        let cfg = config_with(vec![n]);
        let mut pipeline = ActivationPipeline::new();
        let result = pipeline.process(&IncomingMessage::new("Alex says hi"), &cfg, Instant::now(), 7);
        assert_eq!(result.scheduled, 2);
        assert_eq!(pipeline.pending_responses(), 2);
        assert!(pipeline.advance(8, &KeyBindings::new()).is_empty());

        let due: Vec<_> = pipeline
            .advance(9, &KeyBindings::new())
            .into_iter()
            .map(|d| d.command)
            .collect();
        assert_eq!(
            due,
            [
                OutputCommand::SendOutgoing {
                    kind: OutgoingKind::Chat,
                    text: "hi Alex".into()
                },
                OutputCommand::SendOutgoing {
                    kind: OutgoingKind::Command,
                    text: "wave Alex".into()
                },
            ]
        );
    }

    #[test]
    fn own_messages_follow_check_own_mode() {
        let mut own_off = rule("hello", "off");
        own_off.check_own_mode = CheckOwnMode::Off;
        let mut own_on = rule("hello", "on");
        own_on.check_own_mode = CheckOwnMode::On;
        let mut cfg = config_with(vec![own_off, own_on]);
        cfg.sender_detection_mode = SenderDetectionMode::SentMatch;
        cfg.notif_mode = NotifMode::All;

        let now = Instant::now();
        let mut pipeline = ActivationPipeline::new();
        pipeline.record_outgoing("hello", false, now, &cfg);
        let result = pipeline.process(&IncomingMessage::new("<Steve> hello"), &cfg, now, 0);
        assert!(result.own_message);
        assert_eq!(sound_ids(&result), ["on"]);

        // The echo was consumed; the next identical message is not own.
        let result = pipeline.process(&IncomingMessage::new("<Steve> hello"), &cfg, now, 0);
        assert!(!result.own_message);
    }

    #[test]
    fn key_triggers_use_translation_key() {
        let n = Notification::with_triggers(vec![Trigger::key("death")]);
        let cfg = config_with(vec![n]);
        let msg = IncomingMessage::new("Alex fell").with_key("death.fell.accident.generic");
        let result = ActivationPipeline::new().process(&msg, &cfg, Instant::now(), 0);
        assert_eq!(result.activations.len(), 1);
        assert_eq!(spans_of(&result), [(0, 9)]);
    }

    #[test]
    fn reset_drops_scheduled_responses() {
        let mut n = rule("alert", "a");
        n.response_enabled = true;
        n.response_messages = vec![ResponseMessage::new(ResponseKind::Chat, "ack", 20)];
        let cfg = config_with(vec![n]);
        let mut pipeline = ActivationPipeline::new();
        pipeline.process(&IncomingMessage::new("alert"), &cfg, Instant::now(), 0);
        assert_eq!(pipeline.reset(), 1);
        assert!(pipeline.advance(100, &KeyBindings::new()).is_empty());
    }

    #[test]
    fn uncovered_pieces_splits_around_coverage() {
        let covered = [Span::new(2, 4), Span::new(6, 7)];
        assert_eq!(
            uncovered_pieces(Span::new(0, 10), &covered),
            [Span::new(0, 2), Span::new(4, 6), Span::new(7, 10)]
        );
        assert!(uncovered_pieces(Span::new(2, 4), &covered).is_empty());
        assert_eq!(uncovered_pieces(Span::new(3, 5), &covered), [Span::new(4, 5)]);
    }
}
