use std::collections::BTreeSet;

use super::super::patterns::{
    LabelTable, ALLERGEN_NOTICE_RE, ALLERGEN_PATTERNS, DIETARY_PATTERNS, FREE_FROM_RE, SPICE_LEVELS,
};

/// Every dietary label whose pattern matches.
pub fn dietary(text: &str) -> BTreeSet<String> {
    all_labels(&DIETARY_PATTERNS, text)
}

/// Every allergen label whose pattern matches. "Nut-free"-style claims are
/// ignored so they do not flag the allergen they exclude.
pub fn allergens(text: &str) -> BTreeSet<String> {
    let cleaned = FREE_FROM_RE.replace_all(text, " ");
    all_labels(&ALLERGEN_PATTERNS, &cleaned)
}

/// Single-valued: the first label in priority order that matches.
pub fn spice_level(text: &str) -> Option<String> {
    SPICE_LEVELS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(label, _)| label.to_string())
}

/// Remove dietary markers and allergen notices so they do not leak into
/// titles and descriptions.
pub fn strip_markers(text: &str) -> String {
    let mut out = ALLERGEN_NOTICE_RE.replace_all(text, " ").to_string();
    for (_, re) in DIETARY_PATTERNS.iter() {
        out = re.replace_all(&out, " ").to_string();
    }
    out
}

fn all_labels(table: &LabelTable, text: &str) -> BTreeSet<String> {
    table
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(label, _)| label.to_string())
        .collect()
}
