use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Acquisition path of the text handed to the parser. Selects normalization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Text,
    Word,
    Pdf,
    Image,
    Ocr,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Text => "text",
            SourceType::Word => "word",
            SourceType::Pdf => "pdf",
            SourceType::Image => "image",
            SourceType::Ocr => "ocr",
        }
    }

    /// Guess the source type from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" | "md" => Some(SourceType::Text),
            "docx" => Some(SourceType::Word),
            "pdf" => Some(SourceType::Pdf),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp" => {
                Some(SourceType::Image)
            }
            _ => None,
        }
    }

    /// OCR output carries character-confusion artifacts worth correcting.
    pub fn is_ocr(&self) -> bool {
        matches!(self, SourceType::Image | SourceType::Ocr)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub price_text: String,
    pub category: String,
    pub dietary_tags: BTreeSet<String>,
    pub allergens: BTreeSet<String>,
    pub spice_level: Option<String>,
    pub ingredients: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub name: String,
    pub description: Option<String>,
    pub confidence: f64,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParsingQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for ParsingQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParsingQuality::Excellent => "Excellent",
            ParsingQuality::Good => "Good",
            ParsingQuality::Fair => "Fair",
            ParsingQuality::Poor => "Poor",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietaryAnalysis {
    pub dietary_tags: BTreeMap<String, usize>,
    pub allergens: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_sections: usize,
    pub total_items: usize,
    pub items_with_prices: usize,
    pub price_coverage: f64,
    pub price_range: Option<PriceRange>,
    pub section_names: Vec<String>,
    pub dietary_analysis: DietaryAnalysis,
    pub average_items_per_section: f64,
    pub average_confidence: f64,
    pub parsing_quality: ParsingQuality,
}

impl Summary {
    pub fn empty() -> Self {
        Summary {
            total_sections: 0,
            total_items: 0,
            items_with_prices: 0,
            price_coverage: 0.0,
            price_range: None,
            section_names: Vec::new(),
            dietary_analysis: DietaryAnalysis::default(),
            average_items_per_section: 0.0,
            average_confidence: 0.0,
            parsing_quality: ParsingQuality::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingInfo {
    pub method: String,
    pub confidence: f64,
    pub status: ParseStatus,
    pub source_type: SourceType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    pub sections: Vec<MenuSection>,
    pub total_items: usize,
    pub total_sections: usize,
    pub summary: Summary,
    pub parsing_info: ParsingInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 1 = acquisition, 2 = parsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
}

impl ParseResult {
    pub fn failed(
        method: &str,
        source_type: SourceType,
        stage: u8,
        error: String,
        text_preview: Option<String>,
    ) -> Self {
        ParseResult {
            success: false,
            sections: Vec::new(),
            total_items: 0,
            total_sections: 0,
            summary: Summary::empty(),
            parsing_info: ParsingInfo {
                method: method.to_string(),
                confidence: 0.0,
                status: ParseStatus::Failed,
                source_type,
            },
            error: Some(error),
            stage: Some(stage),
            text_preview,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.sections.iter().flat_map(|s| &s.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_serializes_lowercase() {
        let json = serde_json::to_string(&SourceType::Word).unwrap();
        assert_eq!(json, "\"word\"");
    }

    #[test]
    fn source_type_from_extension() {
        assert_eq!(SourceType::from_extension("PDF"), Some(SourceType::Pdf));
        assert_eq!(SourceType::from_extension("docx"), Some(SourceType::Word));
        assert_eq!(SourceType::from_extension("jpeg"), Some(SourceType::Image));
        assert_eq!(SourceType::from_extension("doc"), None);
    }

    #[test]
    fn failed_result_omits_nothing_it_needs() {
        let r = ParseResult::failed("pattern_matching", SourceType::Text, 2, "no items".into(), None);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["stage"], 2);
        assert_eq!(v["parsing_info"]["status"], "failed");
        assert!(v["summary"]["price_range"].is_null());
        assert!(v.get("text_preview").is_none());
    }
}
