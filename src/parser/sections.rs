use std::ops::Range;

use super::lines::{header_core, is_section_header, LineContext};

pub const DEFAULT_SECTION: &str = "Menu Items";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub name: String,
    pub text: String,
    /// Where `text` sits among the lines of the segmented document, so the
    /// item extractor classifies each line against its real neighbours.
    pub lines: Range<usize>,
}

/// Split normalized menu text into ordered named sections.
///
/// Lines before the first header land in [`DEFAULT_SECTION`]. A header with
/// nothing under it yet is replaced by the next header.
pub fn segment(text: &str) -> Vec<RawSection> {
    let lines: Vec<&str> = text.lines().collect();
    let mut sections: Vec<RawSection> = Vec::new();
    let mut current_name = DEFAULT_SECTION.to_string();
    let mut start = 0;

    for (i, line) in lines.iter().copied().enumerate() {
        if is_section_header(line, LineContext::at(&lines, i)) {
            flush(&mut sections, &current_name, &lines, start..i);
            current_name = normalize_section_name(line);
            start = i + 1;
        }
    }
    flush(&mut sections, &current_name, &lines, start..lines.len());

    sections
}

/// Push the lines in `span` as a section, minus blank lines at either end.
fn flush(sections: &mut Vec<RawSection>, name: &str, lines: &[&str], span: Range<usize>) {
    let filled = |i: &usize| !lines[*i].trim().is_empty();
    let Some(first) = span.clone().find(filled) else {
        return;
    };
    let last = span.rev().find(filled).unwrap_or(first);
    sections.push(RawSection {
        name: name.to_string(),
        text: lines[first..=last].join("\n"),
        lines: first..last + 1,
    });
}

/// Trim, strip punctuation, title-case: `"~~ MAIN COURSES: ~~"` → `"Main Courses"`.
pub fn normalize_section_name(line: &str) -> String {
    let kept: String = header_core(line)
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '&' || c == '\'' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let name = kept
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        DEFAULT_SECTION.to_string()
    } else {
        name
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
