//! Trigger matching against message text and translation keys.

use regex::Regex;
use serde::Serialize;

use crate::config::{Trigger, TriggerKind};

/// Byte range within a message (`start..end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The spanned text, or `""` when the span does not fit `text`.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or("")
    }
}

impl From<regex::Match<'_>> for Span {
    fn from(m: regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }
}

/// Where a trigger matched, plus capture groups for regex triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub span: Span,
    /// `groups[i]` is capture group `i + 1`; `None` when the group did not participate.
    pub groups: Vec<Option<Span>>,
}

impl MatchInfo {
    pub fn whole(span: Span) -> Self {
        Self {
            span,
            groups: Vec::new(),
        }
    }

    /// Capture group by 1-based index; `0` is the whole match.
    pub fn group(&self, index: usize) -> Option<Span> {
        match index {
            0 => Some(self.span),
            n => self.groups.get(n - 1).copied().flatten(),
        }
    }

    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let whole = caps.get(0)?;
        let groups = (1..caps.len())
            .map(|i| caps.get(i).map(Span::from))
            .collect();
        Some(Self {
            span: whole.into(),
            groups,
        })
    }
}

/// Match one trigger. Disabled and blank triggers never match; `Key` triggers need a key.
pub fn match_trigger(trigger: &Trigger, text: &str, key: Option<&str>) -> Option<MatchInfo> {
    if !trigger.enabled || trigger.text.trim().is_empty() {
        return None;
    }
    match trigger.kind {
        TriggerKind::Normal => {
            let re = trigger.pattern()?;
            re.find(text).map(|m| MatchInfo::whole(m.into()))
        }
        TriggerKind::Regex => {
            let re = trigger.pattern()?;
            re.captures(text).as_ref().and_then(MatchInfo::from_captures)
        }
        TriggerKind::Key => {
            key_matches(&trigger.text, key?).then(|| MatchInfo::whole(Span::new(0, text.len())))
        }
    }
}

/// Every non-overlapping, non-empty occurrence of the trigger in `text`.
pub fn match_all_instances(trigger: &Trigger, text: &str, key: Option<&str>) -> Vec<MatchInfo> {
    if !trigger.enabled || trigger.text.trim().is_empty() {
        return Vec::new();
    }
    match trigger.kind {
        TriggerKind::Normal => trigger
            .pattern()
            .map(|re| find_all(&re, text).into_iter().map(MatchInfo::whole).collect())
            .unwrap_or_default(),
        TriggerKind::Regex => trigger
            .pattern()
            .map(|re| {
                re.captures_iter(text)
                    .filter_map(|caps| MatchInfo::from_captures(&caps))
                    .filter(|info| !info.span.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        TriggerKind::Key => match_trigger(trigger, text, key).into_iter().collect(),
    }
}

/// Logical OR over a trigger list: the first matching trigger and its index.
pub fn first_match(
    triggers: &[Trigger],
    text: &str,
    key: Option<&str>,
) -> Option<(usize, MatchInfo)> {
    triggers
        .iter()
        .enumerate()
        .find_map(|(i, t)| match_trigger(t, text, key).map(|info| (i, info)))
}

/// Logical AND over the enabled triggers of a list (vacuously true when none are enabled).
pub fn all_match(triggers: &[Trigger], text: &str, key: Option<&str>) -> bool {
    triggers
        .iter()
        .filter(|t| t.enabled)
        .all(|t| match_trigger(t, text, key).is_some())
}

/// Logical OR as a plain predicate.
pub fn any_match(triggers: &[Trigger], text: &str, key: Option<&str>) -> bool {
    first_match(triggers, text, key).is_some()
}

/// Non-empty matches of `re` in `text`.
pub(crate) fn find_all(re: &Regex, text: &str) -> Vec<Span> {
    re.find_iter(text)
        .map(Span::from)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Dot-segment prefix test: `chat.type` matches `chat.type` and `chat.type.text`, not
/// `chat.typex`.
fn key_matches(prefix: &str, key: &str) -> bool {
    let prefix = prefix.trim();
    match key.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => prefix.ends_with('.') || rest.starts_with('.'),
        None => false,
    }
}
