//! Activation decision for a single notification.
//!
//! The checks run in a fixed order and stop at the first failure:
//! enabled/editing, own-message policy, inclusion (AND), triggers (OR), exclusion (OR),
//! then style span resolution. The failing step is reported as a [`Rejection`] so callers
//! can trace why a rule stayed quiet.

use crate::config::{CheckOwnMode, Notification};

use super::style;
use super::trigger::{MatchInfo, Span, all_match, any_match, first_match};

/// One notification passing all of its checks for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Position of the notification in the ordered list.
    pub notification_index: usize,
    /// Index of the first matching trigger.
    pub trigger_index: usize,
    pub match_info: MatchInfo,
    /// Restyle spans for the first match (sorted, non-empty).
    pub style_spans: Vec<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Disabled,
    Editing,
    OwnMessage,
    InclusionUnmet,
    NoTriggerMatch,
    Excluded,
}

/// Whether a notification may react to a message given its own-message status.
pub fn own_message_allowed(mode: CheckOwnMode, own_msg: bool, check_own_messages: bool) -> bool {
    if !own_msg {
        return true;
    }
    match mode {
        CheckOwnMode::On => true,
        CheckOwnMode::Defer => check_own_messages,
        CheckOwnMode::Off => false,
    }
}

/// Run every check and report either the activation or the first failing step.
pub fn check(
    index: usize,
    notification: &Notification,
    text: &str,
    key: Option<&str>,
    own_msg: bool,
    check_own_messages: bool,
) -> Result<Activation, Rejection> {
    if !notification.enabled {
        return Err(Rejection::Disabled);
    }
    if notification.editing {
        return Err(Rejection::Editing);
    }
    if !own_message_allowed(notification.check_own_mode, own_msg, check_own_messages) {
        return Err(Rejection::OwnMessage);
    }
    if notification.inclusion_enabled && !all_match(&notification.inclusion_triggers, text, key)
    {
        return Err(Rejection::InclusionUnmet);
    }
    let (trigger_index, match_info) =
        first_match(&notification.triggers, text, key).ok_or(Rejection::NoTriggerMatch)?;
    if notification.exclusion_enabled && any_match(&notification.exclusion_triggers, text, key) {
        return Err(Rejection::Excluded);
    }
    let style_spans = style::resolve(&notification.triggers[trigger_index], &match_info, text);
    Ok(Activation {
        notification_index: index,
        trigger_index,
        match_info,
        style_spans,
    })
}

/// [`check`] without the rejection reason.
pub fn evaluate(
    index: usize,
    notification: &Notification,
    text: &str,
    key: Option<&str>,
    own_msg: bool,
    check_own_messages: bool,
) -> Option<Activation> {
    check(index, notification, text, key, own_msg, check_own_messages).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StyleTarget, StyleTargetKind, Trigger};

    fn alert() -> Notification {
        Notification::with_triggers(vec![Trigger::normal("alert")])
    }

    fn run(n: &Notification, text: &str) -> Result<Activation, Rejection> {
        check(3, n, text, None, false, false)
    }

    #[test]
    fn activates_on_trigger() {
        let a = run(&alert(), "red alert!").unwrap();
        assert_eq!(a.notification_index, 3);
        assert_eq!(a.trigger_index, 0);
        assert_eq!(a.style_spans, [Span::new(4, 9)]);
    }

    #[test]
    fn disabled_and_editing_rules_are_skipped() {
        let mut n = alert();
        n.editing = true;
        assert_eq!(run(&n, "alert"), Err(Rejection::Editing));
        n.enabled = false;
        assert_eq!(run(&n, "alert"), Err(Rejection::Disabled));
    }

    #[test]
    fn own_message_policy() {
        assert!(own_message_allowed(CheckOwnMode::Off, false, false));
        assert!(own_message_allowed(CheckOwnMode::On, true, false));
        assert!(own_message_allowed(CheckOwnMode::Defer, true, true));
        assert!(!own_message_allowed(CheckOwnMode::Defer, true, false));
        assert!(!own_message_allowed(CheckOwnMode::Off, true, true));

        let mut n = alert();
        n.check_own_mode = CheckOwnMode::Off;
        assert_eq!(
            check(0, &n, "alert", None, true, true),
            Err(Rejection::OwnMessage)
        );
    }

    #[test]
    fn exclusion_suppresses_activation() {
        let mut n = alert();
        n.exclusion_enabled = true;
        n.exclusion_triggers = vec![Trigger::normal("ignore")];
        assert_eq!(run(&n, "please ignore this alert"), Err(Rejection::Excluded));
        assert!(run(&n, "this alert matters").is_ok());

        n.exclusion_enabled = false;
        assert!(run(&n, "please ignore this alert").is_ok());
    }

    #[test]
    fn inclusion_requires_all_enabled_triggers() {
        let mut n = alert();
        n.inclusion_enabled = true;
        n.inclusion_triggers = vec![Trigger::normal("base"), Trigger::normal("north")];
        assert_eq!(run(&n, "alert at base"), Err(Rejection::InclusionUnmet));
        assert!(run(&n, "alert at north base").is_ok());
    }

    #[test]
    fn inclusion_with_only_disabled_triggers_is_vacuous() {
        let mut with = alert();
        with.inclusion_enabled = true;
        with.inclusion_triggers = vec![Trigger::normal("never").disabled()];
        let without = alert();
        for text in ["alert", "no match here", "ALERT twice alert"] {
            assert_eq!(run(&with, text), run(&without, text));
        }
    }

    #[test]
    fn inclusion_and_exclusion_ignore_style_targets() {
        let mut n = alert();
        n.inclusion_enabled = true;
        n.inclusion_triggers = vec![
            Trigger::normal("base")
                .with_style_target(StyleTarget::new("zzz", StyleTargetKind::Normal)),
        ];
        let a = run(&n, "alert base").unwrap();
        assert_eq!(a.style_spans, [Span::new(0, 5)]);
    }

    #[test]
    fn no_trigger_match() {
        assert_eq!(run(&alert(), "all quiet"), Err(Rejection::NoTriggerMatch));
        assert!(evaluate(0, &Notification::default(), "anything", None, false, false).is_none());
    }
}
