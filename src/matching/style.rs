//! Narrowing of restyle spans through a trigger's style target.

use crate::config::{StyleTargetKind, Trigger, TriggerKind};

use super::trigger::{MatchInfo, Span, find_all, match_all_instances};

/// Spans to restyle for one trigger match, sorted ascending and non-empty.
///
/// An inactive target, or one that resolves to nothing, keeps the full trigger match.
pub fn resolve(trigger: &Trigger, info: &MatchInfo, text: &str) -> Vec<Span> {
    let target = &trigger.style_target;
    if !target.is_active() {
        return non_empty(vec![info.span]);
    }
    let narrowed = match target.kind {
        StyleTargetKind::Normal | StyleTargetKind::Regex => target
            .pattern()
            .and_then(|re| re.find(text))
            .map(|m| vec![Span::from(m)])
            .unwrap_or_default(),
        StyleTargetKind::Capturing => capture_spans(trigger, info),
    };
    let narrowed = non_empty(narrowed);
    if narrowed.is_empty() {
        non_empty(vec![info.span])
    } else {
        narrowed
    }
}

/// Spans to restyle for every occurrence of the trigger in `text`.
pub fn resolve_all_instances(trigger: &Trigger, text: &str, key: Option<&str>) -> Vec<Span> {
    let matches = match_all_instances(trigger, text, key);
    if matches.is_empty() {
        return Vec::new();
    }
    let target = &trigger.style_target;
    let mut spans = match target.kind {
        StyleTargetKind::Normal | StyleTargetKind::Regex if target.is_active() => {
            let found = target
                .pattern()
                .map(|re| find_all(&re, text))
                .unwrap_or_default();
            if found.is_empty() {
                matches.iter().map(|m| m.span).collect()
            } else {
                found
            }
        }
        _ => matches
            .iter()
            .flat_map(|m| resolve(trigger, m, text))
            .collect(),
    };
    spans.sort();
    spans.dedup();
    non_empty(spans)
}

/// Parse a comma-separated list of 1-based group indices; junk entries are dropped.
pub fn parse_group_indices(text: &str) -> Vec<usize> {
    text.split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|&i| i > 0)
        .collect()
}

fn capture_spans(trigger: &Trigger, info: &MatchInfo) -> Vec<Span> {
    if trigger.kind != TriggerKind::Regex {
        return Vec::new();
    }
    let mut spans: Vec<Span> = parse_group_indices(&trigger.style_target.text)
        .into_iter()
        .filter_map(|i| info.group(i))
        .collect();
    spans.sort();
    spans.dedup();
    spans
}

fn non_empty(spans: Vec<Span>) -> Vec<Span> {
    spans.into_iter().filter(|s| !s.is_empty()).collect()
}
