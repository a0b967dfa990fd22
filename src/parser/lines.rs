//! Line classification shared by the segmenter and the item extractor.

use super::extract::price;
use super::patterns::{CANONICAL_HEADERS, CONNECTIVE_RE, TITLE_CASCADE};

const MAX_HEADER_WORDS: usize = 4;
const MAX_HEADER_LEN: usize = 40;
const CONTINUATION_MIN_LEN: usize = 20;

/// Neighbouring lines of the line being classified.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineContext<'a> {
    pub prev: Option<&'a str>,
    pub next: Option<&'a str>,
}

impl<'a> LineContext<'a> {
    pub fn at(lines: &[&'a str], idx: usize) -> Self {
        LineContext {
            prev: idx.checked_sub(1).and_then(|i| lines.get(i).copied()),
            next: lines.get(idx + 1).copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    ItemStart,
    Continuation,
    Other,
}

pub fn classify(line: &str, ctx: LineContext<'_>) -> LineKind {
    if is_section_header(line, ctx) {
        LineKind::Header
    } else if is_item_start(line) {
        LineKind::ItemStart
    } else if is_description_continuation(line, ctx) {
        LineKind::Continuation
    } else {
        LineKind::Other
    }
}

/// Classification for the single-section fallback pass: header detection is
/// off, so header-looking lines compete as items.
pub fn classify_without_headers(line: &str) -> LineKind {
    if is_item_start(line) {
        LineKind::ItemStart
    } else if has_description_shape(line.trim()) {
        LineKind::Continuation
    } else {
        LineKind::Other
    }
}

pub fn is_section_header(line: &str, ctx: LineContext<'_>) -> bool {
    let line = line.trim();
    if line.is_empty() || price::has_price(line) {
        return false;
    }

    let core = header_core(line);
    if core.is_empty() {
        return false;
    }
    if CANONICAL_HEADERS.iter().any(|c| c.re.is_match(core)) {
        return true;
    }

    let words = core.split_whitespace().count();
    if words == 0 || words > MAX_HEADER_WORDS || core.chars().count() > MAX_HEADER_LEN {
        return false;
    }

    if is_all_caps(core) {
        return true;
    }

    // Isolated title-case line: starts a paragraph and is not followed by an item.
    let isolated = ctx.prev.map_or(true, |p| p.trim().is_empty());
    let followed_by_non_item = ctx
        .next
        .is_some_and(|n| !n.trim().is_empty() && !is_item_start(n));
    isolated && followed_by_non_item && is_title_case(core)
}

pub fn is_item_start(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }
    price::has_price(line) || TITLE_CASCADE.iter().any(|p| p.re.is_match(line))
}

pub fn is_description_continuation(line: &str, ctx: LineContext<'_>) -> bool {
    let line = line.trim();
    if line.is_empty() || is_section_header(line, ctx) || is_item_start(line) {
        return false;
    }
    has_description_shape(line)
}

fn has_description_shape(line: &str) -> bool {
    CONNECTIVE_RE.is_match(line) || line.chars().count() > CONTINUATION_MIN_LEN
}

/// Header text without surrounding decoration ("~~ DESSERTS ~~", "Mains:").
pub fn header_core(line: &str) -> &str {
    line.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_all_caps(s: &str) -> bool {
    s.chars().any(|c| c.is_alphabetic()) && !s.chars().any(|c| c.is_lowercase())
}

fn is_title_case(s: &str) -> bool {
    const MINOR: &[&str] = &["&", "and", "or", "of", "with", "the", "a", "in", "on", "from"];
    if s.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut words = s.split_whitespace();
    let starts_upper = |w: &str| w.chars().next().is_some_and(|c| c.is_uppercase());
    match words.next() {
        Some(first) if starts_upper(first) => {}
        _ => return false,
    }
    words.all(|w| starts_upper(w) || MINOR.contains(&w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> LineContext<'static> {
        LineContext::default()
    }

    #[test]
    fn canonical_headers() {
        for h in ["APPETIZERS", "Main Courses", "Desserts:", "~~ SIDES ~~", "Our Wine List", "Kids Menu"] {
            assert!(is_section_header(h, none()), "{h}");
        }
    }

    #[test]
    fn short_all_caps_is_header() {
        assert!(is_section_header("FROM THE GRILL", none()));
        assert!(!is_section_header("THIS LINE HAS FAR TOO MANY WORDS", none()));
    }

    #[test]
    fn priced_line_is_never_header() {
        assert!(!is_section_header("PIZZA MARGHERITA $14", none()));
        assert!(!is_section_header("Desserts $9", none()));
    }

    #[test]
    fn isolated_title_case_header() {
        let ctx = LineContext { prev: Some(""), next: Some("Ask your server about today's catch") };
        assert!(is_section_header("Chef Favourites", ctx));

        // followed by an item line
        let ctx = LineContext { prev: None, next: Some("Grilled Salmon $28") };
        assert!(!is_section_header("Chef Favourites", ctx));

        // not at the start of a paragraph
        let ctx = LineContext { prev: Some("Tiramisu $9"), next: Some("layered with mascarpone and espresso") };
        assert!(!is_section_header("Chef Favourites", ctx));

        // nothing follows
        assert!(!is_section_header("Chef Favourites", none()));
    }

    #[test]
    fn item_starts() {
        assert!(is_item_start("Bruschetta - Toasted bread with tomatoes $12"));
        assert!(is_item_start("12 USD"));
        assert!(is_item_start("1. Bruschetta"));
        assert!(is_item_start("Margherita Pizza"));
        assert!(is_item_start("GRILLED SALMON"));
        assert!(is_item_start("Soup | Tomato Basil | $8"));
        assert!(!is_item_start("toasted bread with tomatoes"));
        assert!(!is_item_start(""));
    }

    #[test]
    fn continuations() {
        assert!(is_description_continuation("served with fries", none()));
        assert!(is_description_continuation("a rich, slow-cooked ragù of veal", none()));
        assert!(!is_description_continuation("crispy", none()));
        assert!(!is_description_continuation("Tiramisu $9", none()));
        assert!(!is_description_continuation("DESSERTS", none()));
    }

    #[test]
    fn classify_dispatch() {
        assert_eq!(classify("DESSERTS", none()), LineKind::Header);
        assert_eq!(classify("Tiramisu $9", none()), LineKind::ItemStart);
        assert_eq!(classify("layered with mascarpone", none()), LineKind::Continuation);
        assert_eq!(classify("ok", none()), LineKind::Other);
    }

    #[test]
    fn fallback_classification_ignores_headers() {
        assert_eq!(classify_without_headers("GRILLED SALMON"), LineKind::ItemStart);
        assert_eq!(classify_without_headers("with lemon butter"), LineKind::Continuation);
        assert_eq!(classify_without_headers(""), LineKind::Other);
    }

    #[test]
    fn context_at_edges() {
        let lines = ["a", "b", "c"];
        let first = LineContext::at(&lines, 0);
        assert_eq!(first.prev, None);
        assert_eq!(first.next, Some("b"));
        let last = LineContext::at(&lines, 2);
        assert_eq!(last.prev, Some("b"));
        assert_eq!(last.next, None);
    }
}
