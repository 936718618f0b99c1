use crate::matching::trigger::MatchInfo;

/// Replace capture placeholders in `template` with text captured by a regex trigger.
///
/// Supported token formats:
/// - `$0` -> the whole match
/// - `$1`, `$2`, ... `$12` -> the given capture group (all following digits are read)
///
/// Notes:
/// - Groups that do not exist or did not participate collapse to an empty string.
/// - A `$` not followed by a digit is kept as-is, so prices like `5$` survive.
pub fn interpolate_captures(template: &str, text: &str, info: &MatchInfo) -> String {
    let mut out = String::with_capacity(template.len());
    let mut idx = 0;
    let bytes = template.as_bytes();

    while let Some(dollar) = find_byte(bytes, b'$', idx) {
        // Push everything up to the token
        out.push_str(&template[idx..dollar]);

        let digits_start = dollar + 1;
        let digits_end = bytes[digits_start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |p| digits_start + p);

        if digits_end == digits_start {
            // Not a placeholder
            out.push('$');
        } else {
            let group = template[digits_start..digits_end]
                .parse::<usize>()
                .ok()
                .and_then(|n| info.group(n));
            if let Some(span) = group {
                out.push_str(span.slice(text));
            }
        }
        idx = digits_end.max(digits_start);
    }

    // Push any trailing text
    if idx < template.len() {
        out.push_str(&template[idx..]);
    }

    out
}

/// True when `template` contains at least one `$N` placeholder.
pub fn has_placeholders(template: &str) -> bool {
    template
        .as_bytes()
        .windows(2)
        .any(|w| w[0] == b'$' && w[1].is_ascii_digit())
}

/// Find the first occurrence of `needle` in `haystack` starting at `from`.
fn find_byte(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|p| from + p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Trigger;
    use crate::matching::trigger::match_trigger;

    fn info_for(pattern: &str, text: &str) -> MatchInfo {
        match_trigger(&Trigger::regex(pattern), text, None).unwrap()
    }

    #[test]
    fn test_interpolate_groups() {
        let text = "<Alex> hi there";
        let info = info_for(r"<(\w+)> (.*)", text);
        assert_eq!(
            interpolate_captures("$1 said: $2", text, &info),
            "Alex said: hi there"
        );
        assert_eq!(interpolate_captures("[$0]", text, &info), "[<Alex> hi there]");
    }

    #[test]
    fn test_unresolved_groups_collapse() {
        let text = "ab";
        let info = info_for("(a)(x)?b", text);
        assert_eq!(interpolate_captures("<$2|$9|$1>", text, &info), "<||a>");
    }

    #[test]
    fn test_dollar_without_digit_is_literal() {
        let text = "ab";
        let info = info_for("(a)", text);
        assert_eq!(interpolate_captures("costs 5$ and $", text, &info), "costs 5$ and $");
        assert_eq!(interpolate_captures("$$1", text, &info), "$a");
    }

    #[test]
    fn test_multi_digit_group() {
        let text = "abcdefghijkl";
        let info = info_for("(a)(b)(c)(d)(e)(f)(g)(h)(i)(j)(k)(l)", text);
        assert_eq!(interpolate_captures("$12$1", text, &info), "la");
    }

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("hi $1"));
        assert!(!has_placeholders("costs 5$"));
        assert!(!has_placeholders(""));
    }
}
