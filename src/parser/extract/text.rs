use super::super::patterns::{
    DESCRIPTION_PREFIX_RE, EDGE_DEBRIS_RE, EMPTY_PARENS_RE, LEADING_NUMBER_RE, MULTI_SPACE_RE,
    SEPARATOR_RE, TITLE_CASCADE,
};
use super::tags::strip_markers;

const FALLBACK_TITLE_WORDS: usize = 8;

pub fn title(line: &str, price_text: &str) -> String {
    let work = tidy(&strip_markers(&remove_once(line, price_text)));
    if work.is_empty() {
        return String::new();
    }

    let from_cascade = TITLE_CASCADE.iter().find_map(|p| {
        p.re.captures(&work)
            .and_then(|c| c.name("title"))
            .map(|m| tidy(m.as_str()))
            .filter(|t| !t.is_empty())
    });
    if let Some(t) = from_cascade {
        return t;
    }

    let unnumbered = LEADING_NUMBER_RE.replace(&work, "");
    if let Some(sep) = SEPARATOR_RE.find(&unnumbered) {
        let head = tidy(&unnumbered[..sep.start()]);
        if !head.is_empty() {
            return head;
        }
    }
    unnumbered
        .split_whitespace()
        .take(FALLBACK_TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn description(line: &str, title: &str, price_text: &str) -> String {
    let line = LEADING_NUMBER_RE.replace(line.trim_start(), "");
    let work = remove_once(&remove_once(&line, title), price_text);
    let work = strip_markers(&work);

    let after_sep = match SEPARATOR_RE.find(&work) {
        Some(sep) => &work[sep.end()..],
        None => work.as_str(),
    };
    let cleaned = tidy(after_sep);
    tidy(&DESCRIPTION_PREFIX_RE.replace(&cleaned, ""))
}

/// Collapse whitespace, drop empty brackets and separator debris at the ends.
pub fn tidy(s: &str) -> String {
    let s = EMPTY_PARENS_RE.replace_all(s, " ");
    let s = MULTI_SPACE_RE.replace_all(&s, " ");
    EDGE_DEBRIS_RE.replace_all(s.trim(), "").trim().to_string()
}

fn remove_once(haystack: &str, needle: &str) -> String {
    if needle.is_empty() {
        haystack.to_string()
    } else {
        haystack.replacen(needle, " ", 1)
    }
}
