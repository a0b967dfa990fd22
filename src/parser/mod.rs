pub mod extract;
pub mod items;
pub mod lines;
pub mod normalize;
pub mod patterns;
pub mod score;
pub mod sections;

use tracing::{debug, info, warn};

use crate::acquire::Acquirer;
use crate::config::Settings;
use crate::model::{MenuSection, ParseResult, ParseStatus, ParsingInfo, SourceType};
use items::{ExtractedSection, ItemExtractor};
use sections::{RawSection, DEFAULT_SECTION};

pub const METHOD: &str = "pattern_matching";
pub const FALLBACK_METHOD: &str = "pattern_matching_fallback";

const DEFAULT_PREVIEW_CHARS: usize = 200;

/// Stage 2 entry point: raw text in, [`ParseResult`] out. Holds no per-call
/// state, so one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct MenuParser {
    preview_chars: usize,
}

impl Default for MenuParser {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl MenuParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            preview_chars: settings.preview_chars,
        }
    }

    /// Normalize → segment → extract items → score. Never fails: a document
    /// with no recognisable items comes back with `success = false`, `stage = 2`.
    pub fn parse_text(&self, raw: &str, source_type: SourceType) -> ParseResult {
        let cleaned = normalize::normalize(raw, source_type);
        if cleaned.is_empty() {
            warn!(%source_type, "document is empty after normalization");
            return ParseResult::failed(
                METHOD,
                source_type,
                2,
                "document contains no text".to_string(),
                Some(String::new()),
            );
        }

        let lines: Vec<&str> = cleaned.lines().collect();
        let raw_sections = sections::segment(&cleaned);
        debug!(sections = raw_sections.len(), chars = cleaned.len(), "segmented");

        let mut method = METHOD;
        let mut menu_sections: Vec<MenuSection> = raw_sections
            .iter()
            .filter_map(|raw| build_section(raw, &lines))
            .collect();

        if menu_sections.is_empty() {
            info!("no items in any section, retrying as a single section");
            method = FALLBACK_METHOD;
            let extracted = ItemExtractor::without_headers(DEFAULT_SECTION).run(&cleaned);
            menu_sections.extend(finish_section(DEFAULT_SECTION, extracted));
        }

        if menu_sections.is_empty() {
            warn!(%source_type, "no menu items found");
            return ParseResult::failed(
                method,
                source_type,
                2,
                "no menu items could be extracted".to_string(),
                Some(preview(&cleaned, self.preview_chars)),
            );
        }

        let confidence = score::document_confidence(&menu_sections);
        let summary = score::summarize(&menu_sections, confidence);
        info!(
            sections = summary.total_sections,
            items = summary.total_items,
            confidence,
            quality = %summary.parsing_quality,
            "parsed menu"
        );

        ParseResult {
            success: true,
            total_items: summary.total_items,
            total_sections: summary.total_sections,
            sections: menu_sections,
            summary,
            parsing_info: ParsingInfo {
                method: method.to_string(),
                confidence,
                status: ParseStatus::Completed,
                source_type,
            },
            error: None,
            stage: None,
            text_preview: None,
        }
    }

    /// Both stages. Acquisition errors become a `stage = 1` failure result.
    pub async fn parse_document(
        &self,
        bytes: Vec<u8>,
        source_type: SourceType,
        acquirer: &Acquirer,
    ) -> ParseResult {
        match acquirer.acquire(bytes, source_type).await {
            Ok(acquired) => {
                for note in &acquired.diagnostics {
                    info!(source_type = %acquired.source_type, note = %note, "acquisition");
                }
                self.parse_text(&acquired.text, acquired.source_type)
            }
            Err(e) => {
                warn!(%source_type, error = %e, "text extraction failed");
                ParseResult::failed(METHOD, source_type, 1, e.to_string(), None)
            }
        }
    }
}

fn build_section(raw: &RawSection, lines: &[&str]) -> Option<MenuSection> {
    let extracted = ItemExtractor::new(&raw.name).run_span(lines, raw.lines.clone());
    finish_section(&raw.name, extracted)
}

/// Score the items and wrap them; sections without items are dropped.
fn finish_section(name: &str, extracted: ExtractedSection) -> Option<MenuSection> {
    if extracted.items.is_empty() {
        debug!(section = name, "dropping section without items");
        return None;
    }
    let mut items = extracted.items;
    for item in &mut items {
        item.confidence = score::score_item(item);
    }
    Some(MenuSection {
        name: name.to_string(),
        description: extracted.description,
        confidence: score::section_confidence(&items),
        items,
    })
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParsingQuality;

    fn parse(text: &str) -> ParseResult {
        MenuParser::new().parse_text(text, SourceType::Text)
    }

    #[test]
    fn sections_and_items_scenario() {
        let r = parse(
            "APPETIZERS\nBruschetta - Toasted bread with tomatoes $12\n\nMAIN COURSES\nGrilled Salmon - Lemon butter sauce $28 (GF)",
        );
        assert!(r.success);
        assert_eq!(r.total_sections, 2);
        assert_eq!(r.total_items, 2);
        assert_eq!(r.summary.section_names, vec!["Appetizers", "Main Courses"]);

        let bruschetta = &r.sections[0].items[0];
        assert_eq!(bruschetta.title, "Bruschetta");
        assert_eq!(bruschetta.price, Some(12.0));
        assert_eq!(bruschetta.category, "Appetizers");

        let salmon = &r.sections[1].items[0];
        assert!(salmon.dietary_tags.contains("gluten_free"));
        assert_eq!(r.summary.price_coverage, 100.0);
        assert_eq!(r.parsing_info.method, METHOD);
        assert_eq!(r.summary.parsing_quality, ParsingQuality::Excellent);
    }

    #[test]
    fn headerless_single_item() {
        let r = parse("Margherita Pizza - tomato, mozzarella, basil $14");
        assert!(r.success);
        assert_eq!(r.total_sections, 1);
        assert_eq!(r.sections[0].name, DEFAULT_SECTION);
        assert_eq!(r.total_items, 1);
    }

    #[test]
    fn flattened_word_table_row() {
        let r = MenuParser::new().parse_text("Soup | Tomato Basil | $8", SourceType::Word);
        assert!(r.success);
        assert_eq!(r.total_items, 1);
        let item = &r.sections[0].items[0];
        assert_eq!(item.title, "Soup");
        assert_eq!(item.price, Some(8.0));
        assert_eq!(r.parsing_info.source_type, SourceType::Word);
    }

    #[test]
    fn empty_input_fails_at_stage_two() {
        let r = parse("");
        assert!(!r.success);
        assert_eq!(r.total_items, 0);
        assert_eq!(r.stage, Some(2));
        assert_eq!(r.parsing_info.status, ParseStatus::Failed);
        assert!(r.error.is_some());
    }

    #[test]
    fn header_only_document_uses_fallback() {
        let r = parse("GRILLED SALMON\nRIBEYE STEAK");
        assert!(r.success);
        assert_eq!(r.parsing_info.method, FALLBACK_METHOD);
        assert_eq!(r.sections[0].name, DEFAULT_SECTION);
        assert_eq!(r.total_items, 2);
    }

    #[test]
    fn nothing_recognisable_returns_preview() {
        let parser = MenuParser {
            preview_chars: 10,
        };
        let r = parser.parse_text("ok\nno\n...", SourceType::Text);
        assert!(!r.success);
        assert_eq!(r.stage, Some(2));
        assert_eq!(r.text_preview.as_deref(), Some("ok\nno\n..."));

        let r = parser.parse_text("ok\nno\n...\nok\nno", SourceType::Text);
        assert_eq!(r.text_preview.as_deref(), Some("ok\nno\n...\n..."));
    }

    #[test]
    fn totals_match_sections() {
        let r = parse("SOUPS\nMinestrone $7\nFrench Onion $8\n\nDESSERTS\nTiramisu $9");
        let counted: usize = r.sections.iter().map(|s| s.items.len()).sum();
        assert_eq!(r.total_items, counted);
        assert_eq!(r.summary.total_items, counted);
        for item in r.items() {
            assert!((0.0..=100.0).contains(&item.confidence));
        }
        assert!((0.0..=100.0).contains(&r.parsing_info.confidence));
    }

    #[test]
    fn unpriced_item_right_under_header_is_kept() {
        let r = parse(
            "STARTERS\nBruschetta $12\n\nMAINS\nGrilled Salmon\nwith lemon butter sauce and greens\nRibeye Steak $34",
        );
        assert_eq!(r.summary.section_names, vec!["Starters", "Mains"]);
        let titles: Vec<_> = r.items().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Bruschetta", "Grilled Salmon", "Ribeye Steak"]);

        let salmon = &r.sections[1].items[0];
        assert_eq!(salmon.price, None);
        assert_eq!(salmon.description, "with lemon butter sauce and greens");
        assert!(r.sections[1].description.is_none());
    }

    #[test]
    fn no_prices_means_no_range() {
        let r = parse("SALADS\nCaesar Salad\nGreek Salad");
        assert!(r.success);
        assert_eq!(r.summary.price_coverage, 0.0);
        assert!(r.summary.price_range.is_none());
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "STARTERS\nCalamari - fried squid, aioli $14 (contains shellfish)\nThai Wings - very spicy $12\n\nDESSERTS\nVegan Brownie $7";
        let a = serde_json::to_string(&parse(text)).unwrap();
        let b = serde_json::to_string(&parse(text)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("crème brûlée", 4), "crèm...");
        assert_eq!(preview("tea", 10), "tea");
    }
}
