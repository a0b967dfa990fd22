use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::model::SourceType;

static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{00A0}\u{2007}\u{202F}]+").unwrap());
static BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

// OCR confusions
static PIPE_IN_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[\s(])\|([a-z]{2,})|([A-Za-z])\|([a-z])").unwrap());
static NUMERIC_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:[$£€]|\b)[0-9OoIl][0-9OoIl.,]*\b").unwrap());
static DOLLAR_AS_S_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)S(\d{1,3}(?:\.\d{2})?)\b").unwrap());

// Word
static TABLE_PIPES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|(?:\s*\|)+").unwrap());

/// Clean raw text according to the rules for its acquisition path.
///
/// Never fails; text that needs no cleaning comes back unchanged apart from
/// whitespace.
pub fn normalize(raw: &str, source_type: SourceType) -> String {
    let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");

    if source_type.is_ocr() {
        text = fix_ocr_confusions(&text);
    }
    if source_type == SourceType::Word {
        text = fix_word_typography(&text);
    }

    let lines: Vec<String> = text
        .split('\n')
        .map(|l| {
            let l = SPACES_RE.replace_all(l, " ");
            let l = l.trim();
            if source_type == SourceType::Word {
                collapse_table_pipes(l)
            } else {
                l.to_string()
            }
        })
        .collect();

    let joined = lines.join("\n");
    BLANKS_RE.replace_all(&joined, "\n\n").trim().to_string()
}

fn fix_ocr_confusions(text: &str) -> String {
    let text = text.replace('ﬁ', "fi").replace('ﬂ', "fl");

    let text = PIPE_IN_WORD_RE.replace_all(&text, |caps: &Captures| {
        if let Some(word) = caps.get(2) {
            format!("{}I{}", &caps[1], word.as_str())
        } else {
            format!("{}l{}", &caps[3], &caps[4])
        }
    });

    let text = DOLLAR_AS_S_RE.replace_all(&text, "$1$$$2");

    NUMERIC_TOKEN_RE
        .replace_all(&text, |caps: &Captures| fix_numeric_token(&caps[0]))
        .to_string()
}

/// Inside a token that is clearly a number, O/o read as 0 and I/l read as 1.
/// Tokens without at least one real digit are words and are left alone, and
/// the token pattern never ends inside a word, so units like `12oz` survive.
fn fix_numeric_token(token: &str) -> String {
    let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
    let confusables = token.chars().filter(|c| matches!(c, 'O' | 'o' | 'I' | 'l')).count();
    if digits == 0 || confusables == 0 || confusables > digits {
        return token.to_string();
    }
    token
        .chars()
        .map(|c| match c {
            'O' | 'o' => '0',
            'I' | 'l' => '1',
            other => other,
        })
        .collect()
}

fn fix_word_typography(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => " - ".to_string(),
            '\u{2212}' => "-".to_string(),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'".to_string(),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => "\"".to_string(),
            '\u{2026}' => "...".to_string(),
            '\u{2022}' => "•".to_string(),
            other => other.to_string(),
        })
        .collect()
}

fn collapse_table_pipes(line: &str) -> String {
    let collapsed = TABLE_PIPES_RE.replace_all(line, "|");
    collapsed
        .trim_matches(|c: char| c == '|' || c.is_whitespace())
        .to_string()
}
