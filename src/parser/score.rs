//! Heuristic confidence scoring and the result summary.

use std::collections::BTreeMap;

use crate::model::{DietaryAnalysis, MenuItem, MenuSection, ParsingQuality, PriceRange, Summary};

const ITEM_BASE: f64 = 20.0;
const ITEM_PRICE: f64 = 30.0;
const ITEM_TITLE: f64 = 25.0;
const ITEM_DESCRIPTION: f64 = 15.0;
const ITEM_DIETARY: f64 = 10.0;

const PER_SECTION_BONUS: f64 = 5.0;
const MAX_SECTION_BONUS: f64 = 20.0;
const COVERAGE_WEIGHT: f64 = 15.0;

pub fn score_item(item: &MenuItem) -> f64 {
    let mut score = ITEM_BASE;
    if item.price.is_some() {
        score += ITEM_PRICE;
    }
    if item.title.chars().count() > 2 {
        score += ITEM_TITLE;
    }
    if item.description.chars().count() > 5 {
        score += ITEM_DESCRIPTION;
    }
    if !item.dietary_tags.is_empty() {
        score += ITEM_DIETARY;
    }
    score.min(100.0)
}

pub fn section_confidence(items: &[MenuItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    round1(items.iter().map(|i| i.confidence).sum::<f64>() / items.len() as f64)
}

/// Mean item confidence, plus a bonus for recognised structure and for
/// price coverage. Zero when nothing was extracted.
pub fn document_confidence(sections: &[MenuSection]) -> f64 {
    let items: Vec<&MenuItem> = sections.iter().flat_map(|s| &s.items).collect();
    if items.is_empty() {
        return 0.0;
    }
    let mean = items.iter().map(|i| i.confidence).sum::<f64>() / items.len() as f64;
    let structure = (PER_SECTION_BONUS * sections.len() as f64).min(MAX_SECTION_BONUS);
    let coverage = priced(&items) as f64 / items.len() as f64;

    round1((mean + structure + coverage * COVERAGE_WEIGHT).min(100.0))
}

/// Quality label from document confidence and price coverage (percent).
pub fn quality(confidence: f64, price_coverage: f64) -> ParsingQuality {
    if confidence >= 80.0 && price_coverage >= 70.0 {
        ParsingQuality::Excellent
    } else if confidence >= 60.0 && price_coverage >= 50.0 {
        ParsingQuality::Good
    } else if confidence >= 40.0 {
        ParsingQuality::Fair
    } else {
        ParsingQuality::Poor
    }
}

pub fn summarize(sections: &[MenuSection], document_confidence: f64) -> Summary {
    let items: Vec<&MenuItem> = sections.iter().flat_map(|s| &s.items).collect();
    if items.is_empty() {
        return Summary::empty();
    }
    let total = items.len() as f64;
    let prices: Vec<f64> = items.iter().filter_map(|i| i.price).collect();
    let price_range = if prices.is_empty() {
        None
    } else {
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = prices.iter().sum::<f64>() / prices.len() as f64;
        Some(PriceRange {
            min: round2(min),
            max: round2(max),
            average: round2(average),
        })
    };

    let price_coverage = round1(prices.len() as f64 / total * 100.0);

    let mut dietary_tags: BTreeMap<String, usize> = BTreeMap::new();
    let mut allergens: BTreeMap<String, usize> = BTreeMap::new();
    for item in &items {
        for tag in &item.dietary_tags {
            *dietary_tags.entry(tag.clone()).or_default() += 1;
        }
        for allergen in &item.allergens {
            *allergens.entry(allergen.clone()).or_default() += 1;
        }
    }

    Summary {
        total_sections: sections.len(),
        total_items: items.len(),
        items_with_prices: prices.len(),
        price_coverage,
        price_range,
        section_names: sections.iter().map(|s| s.name.clone()).collect(),
        average_items_per_section: round1(total / sections.len() as f64),
        average_confidence: round1(items.iter().map(|i| i.confidence).sum::<f64>() / total),
        dietary_analysis: DietaryAnalysis {
            dietary_tags,
            allergens,
        },
        parsing_quality: quality(document_confidence, price_coverage),
    }
}

fn priced(items: &[&MenuItem]) -> usize {
    items.iter().filter(|i| i.price.is_some()).count()
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
