use std::ops::Range;

use tracing::trace;

use super::extract;
use super::lines::{classify, classify_without_headers, LineContext, LineKind};
use crate::model::MenuItem;

/// Where the extractor is within a section.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// No item open yet.
    Scanning,
    /// An item is open and collecting continuation lines.
    Building(MenuItem),
}

/// What a single line did to the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Scanning -> Building.
    Opened,
    /// Building -> Building: the open item was completed and a new one opened.
    Replaced,
    /// Building -> Building: the line was folded into the open item's description.
    Continued,
    /// A bare price line supplied the open item's missing price.
    PriceAttached,
    /// Scanning: descriptive text before the first item, kept as the section description.
    SectionNote,
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedSection {
    pub items: Vec<MenuItem>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct ItemExtractor<'a> {
    category: &'a str,
    headers: bool,
    state: State,
    items: Vec<MenuItem>,
    notes: Vec<String>,
}

impl<'a> ItemExtractor<'a> {
    pub fn new(category: &'a str) -> Self {
        Self {
            category,
            headers: true,
            state: State::Scanning,
            items: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Extractor for the single-section fallback pass, where header-looking
    /// lines are treated as candidate items.
    pub fn without_headers(category: &'a str) -> Self {
        Self {
            headers: false,
            ..Self::new(category)
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn step(&mut self, line: &str, ctx: LineContext<'_>) -> Transition {
        let kind = if self.headers {
            classify(line, ctx)
        } else {
            classify_without_headers(line)
        };

        match kind {
            LineKind::ItemStart => self.start_item(line),
            LineKind::Continuation => match &mut self.state {
                State::Building(item) => {
                    extract::append_description(item, line);
                    Transition::Continued
                }
                State::Scanning => {
                    self.notes.push(line.trim().to_string());
                    Transition::SectionNote
                }
            },
            LineKind::Header | LineKind::Other => Transition::Ignored,
        }
    }

    fn start_item(&mut self, line: &str) -> Transition {
        let item = extract::item_from_line(line, self.category);

        if item.title.is_empty() {
            if let State::Building(open) = &mut self.state {
                if open.price.is_none() && item.price.is_some() {
                    open.price = item.price;
                    open.price_text = item.price_text;
                    return Transition::PriceAttached;
                }
            }
            return Transition::Ignored;
        }

        match std::mem::replace(&mut self.state, State::Building(item)) {
            State::Scanning => Transition::Opened,
            State::Building(done) => {
                self.items.push(done);
                Transition::Replaced
            }
        }
    }

    /// Complete any open item and hand back everything collected.
    pub fn finish(mut self) -> ExtractedSection {
        if let State::Building(item) = std::mem::replace(&mut self.state, State::Scanning) {
            self.items.push(item);
        }
        let description = if self.notes.is_empty() {
            None
        } else {
            Some(self.notes.join(" "))
        };
        ExtractedSection {
            items: self.items,
            description,
        }
    }

    /// Feed every line of `text` through the machine.
    pub fn run(self, text: &str) -> ExtractedSection {
        let lines: Vec<&str> = text.lines().collect();
        let span = 0..lines.len();
        self.run_span(&lines, span)
    }

    /// Feed `lines[span]` through the machine, classifying each line against
    /// its neighbours in the whole document.
    pub fn run_span(mut self, lines: &[&str], span: Range<usize>) -> ExtractedSection {
        for i in span {
            let Some(&line) = lines.get(i) else {
                break;
            };
            let transition = self.step(line, LineContext::at(lines, i));
            trace!(category = self.category, ?transition, line, "item step");
        }
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(ex: &mut ItemExtractor<'_>, line: &str) -> Transition {
        ex.step(line, LineContext::default())
    }

    #[test]
    fn opens_then_replaces() {
        let mut ex = ItemExtractor::new("Mains");
        assert_eq!(step(&mut ex, "Grilled Salmon - Lemon butter sauce $28"), Transition::Opened);
        assert!(matches!(ex.state(), State::Building(item) if item.title == "Grilled Salmon"));
        assert_eq!(step(&mut ex, "Ribeye Steak $32"), Transition::Replaced);

        let out = ex.finish();
        let titles: Vec<_> = out.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Grilled Salmon", "Ribeye Steak"]);
        assert!(out.items.iter().all(|i| i.category == "Mains"));
    }

    #[test]
    fn continuation_extends_open_item() {
        let mut ex = ItemExtractor::new("Mains");
        step(&mut ex, "Thai Curry $15");
        assert_eq!(
            step(&mut ex, "with coconut milk, peanuts and fresh basil"),
            Transition::Continued
        );
        let out = ex.finish();
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].description, "with coconut milk, peanuts and fresh basil");
        assert!(out.items[0].allergens.contains("nuts"));
        assert!(out.items[0].ingredients.contains(&"basil".to_string()));
    }

    #[test]
    fn description_before_first_item_belongs_to_section() {
        let mut ex = ItemExtractor::new("Desserts");
        assert_eq!(
            step(&mut ex, "All desserts are made in house every morning"),
            Transition::SectionNote
        );
        assert_eq!(*ex.state(), State::Scanning);
        step(&mut ex, "Tiramisu $9");

        let out = ex.finish();
        assert_eq!(out.description.as_deref(), Some("All desserts are made in house every morning"));
        assert_eq!(out.items.len(), 1);
    }

    #[test]
    fn bare_price_line_fills_missing_price() {
        let mut ex = ItemExtractor::new("Mains");
        step(&mut ex, "Chicken Parmesan");
        assert_eq!(step(&mut ex, "$18.50"), Transition::PriceAttached);
        assert_eq!(step(&mut ex, "$20.00"), Transition::Ignored);

        let out = ex.finish();
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].price, Some(18.5));
        assert_eq!(out.items[0].price_text, "$18.50");
    }

    #[test]
    fn bare_price_while_scanning_is_ignored() {
        let mut ex = ItemExtractor::new("Mains");
        assert_eq!(step(&mut ex, "$12"), Transition::Ignored);
        assert!(ex.finish().items.is_empty());
    }

    #[test]
    fn blank_and_short_lines_are_ignored() {
        let mut ex = ItemExtractor::new("Mains");
        step(&mut ex, "Tiramisu $9");
        assert_eq!(step(&mut ex, ""), Transition::Ignored);
        assert_eq!(step(&mut ex, "ok"), Transition::Ignored);
        assert_eq!(ex.finish().items.len(), 1);
    }

    #[test]
    fn run_flushes_final_item() {
        let out = ItemExtractor::new("Appetizers")
            .run("Bruschetta - Toasted bread with tomatoes $12\nCalamari - fried squid, aioli $14");
        assert_eq!(out.items.len(), 2);
        assert_eq!(out.items[1].title, "Calamari");
        assert!(out.description.is_none());
    }

    #[test]
    fn fallback_mode_treats_caps_lines_as_items() {
        let text = "GRILLED SALMON\nRIBEYE STEAK";
        assert!(ItemExtractor::new("Menu Items").run(text).items.is_empty());

        let out = ItemExtractor::without_headers("Menu Items").run(text);
        let titles: Vec<_> = out.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["GRILLED SALMON", "RIBEYE STEAK"]);
    }

    #[test]
    fn unpriced_title_after_header_opens_an_item() {
        let doc = ["MAINS", "Grilled Salmon", "with lemon butter sauce and greens", "Ribeye Steak $34"];

        // Without the header above it the title line reads as a header of its own.
        assert!(ItemExtractor::new("Mains").run(&doc[1..].join("\n")).items.len() < 2);

        let out = ItemExtractor::new("Mains").run_span(&doc, 1..4);
        let titles: Vec<_> = out.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Grilled Salmon", "Ribeye Steak"]);
        assert_eq!(out.items[0].description, "with lemon butter sauce and greens");
        assert!(out.description.is_none());
    }

    #[test]
    fn every_item_has_a_title() {
        let out = ItemExtractor::new("Menu Items").run("$5\n$6\nSoup $8\n$9\n- -\n");
        assert!(out.items.iter().all(|i| !i.title.is_empty()));
    }
}
