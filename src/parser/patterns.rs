//! Every pattern table the parser consults, compiled once per process.
//!
//! Single-valued lookups (title cascade, price formats, spice level, canonical
//! headers) are plain `Vec`s evaluated front to back, so "first match wins"
//! never depends on map iteration order.

use std::sync::LazyLock;

use regex::Regex;

/// Separator tokens between an item title and the rest of the line:
/// spaced hyphen, en/em dash, dot leaders / ellipsis, pipe, bullet.
const SEP: &str = r"(?:\s+-+\s+|\s*[–—]\s*|\s*\.{2,}\s*|\s*…\s*|\s*\|\s*|\s*•\s*)";

pub static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(SEP).unwrap());

/// Leftover separator and punctuation debris at either end of a fragment.
pub static EDGE_DEBRIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\-–—|•.,:;…]+|[\s\-–—|•,:;…]+$").unwrap());

pub static EMPTY_PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)|\[\s*\]").unwrap());

pub static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

pub static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}[.)]\s+").unwrap());

// ── Price ──

pub struct PricePattern {
    pub name: &'static str,
    /// Named groups: `text` is the substring reported as `price_text`,
    /// `amount` is the number parsed into `price`.
    pub re: Regex,
}

const AMOUNT: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?";

pub static PRICE_PATTERNS: LazyLock<Vec<PricePattern>> = LazyLock::new(|| {
    let specs = [
        ("symbol_prefixed", format!(r"(?P<text>[$£€]\s?(?P<amount>{AMOUNT}))")),
        (
            "currency_suffix",
            format!(r"(?i)(?P<text>\b(?P<amount>{AMOUNT})\s*(?:(?:usd|dollars?|eur|euros?|gbp)\b|pounds?\s*$))"),
        ),
        (
            "per_unit",
            r"(?i)(?P<text>\b(?P<amount>\d+(?:\.\d{1,2})?)\s*(?:per\s+person|/\s*person|pp|each|ea)\b)"
                .to_string(),
        ),
        (
            "trailing_amount",
            r"(?:^|[^\d,$£€])(?P<text>(?P<amount>\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2}))\s*$".to_string(),
        ),
    ];
    specs
        .into_iter()
        .map(|(name, pattern)| PricePattern {
            name,
            re: Regex::new(&pattern).unwrap(),
        })
        .collect()
});

// ── Title cascade ──

pub struct TitlePattern {
    pub name: &'static str,
    /// Named group `title` holds the extracted title.
    pub re: Regex,
}

pub static TITLE_CASCADE: LazyLock<Vec<TitlePattern>> = LazyLock::new(|| {
    let specs = [
        (
            "numbered",
            format!(r"^\d{{1,3}}[.)]\s+(?P<title>[^\d\s][^|•…]*?)\s*(?:{SEP}.*)?$"),
        ),
        ("separated", format!(r"^(?P<title>\p{{L}}[^|•…]{{0,59}}?){SEP}")),
        ("all_caps", r"^(?P<title>\p{Lu}[\p{Lu}\d&'’,.\s-]{2,49})$".to_string()),
        (
            "title_case",
            r"^(?P<title>\p{Lu}[\p{L}'’-]*(?:\s+(?:\p{Lu}[\p{L}'’-]*|&|and|or|of|with|the|a|in|on|de|di|la|le|al|au)){0,7})$"
                .to_string(),
        ),
    ];
    specs
        .into_iter()
        .map(|(name, pattern)| TitlePattern {
            name,
            re: Regex::new(&pattern).unwrap(),
        })
        .collect()
});

// ── Section headers ──

pub struct CategoryPattern {
    pub name: &'static str,
    pub re: Regex,
}

/// Canonical menu categories in evaluation order. Matched against a header
/// line with its decoration and trailing colon removed.
pub static CANONICAL_HEADERS: LazyLock<Vec<CategoryPattern>> = LazyLock::new(|| {
    let specs: [(&str, &str); 20] = [
        (
            "appetizers",
            r"appetizers?|starters?|small\s+plates|antipasti|tapas|shareables|for\s+the\s+table",
        ),
        ("soups", r"soups?(?:\s*(?:&|and)\s*salads?)?"),
        ("salads", r"salads?(?:\s*(?:&|and)\s*soups?)?"),
        (
            "mains",
            r"mains?|main\s+(?:courses?|dishes|plates)|entr[eé]es?|large\s+plates",
        ),
        ("pasta", r"pastas?(?:\s*(?:&|and)\s*risottos?)?|risottos?"),
        ("pizza", r"pizzas?"),
        (
            "sandwiches",
            r"(?:burgers?|sandwiches|wraps)(?:\s*(?:&|and)\s*(?:burgers?|sandwiches|wraps))?",
        ),
        ("seafood", r"seafood|from\s+the\s+sea"),
        ("sides", r"sides?(?:\s+dishes)?|accompaniments|extras|add[\s-]?ons"),
        ("desserts", r"desserts?|sweets|puddings?|dolci"),
        (
            "beverages",
            r"beverages?|drinks?|soft\s+drinks|hot\s+drinks|coffee(?:\s*(?:&|and)\s*tea)?|juices?",
        ),
        ("breakfast", r"breakfast|all[\s-]day\s+breakfast"),
        ("brunch", r"brunch"),
        ("lunch", r"lunch(?:\s+specials)?"),
        ("dinner", r"dinner"),
        ("kids", r"kids?'?s?(?:\s+menu)?|children'?s(?:\s+menu)?"),
        ("specials", r"(?:chef'?s\s+|daily\s+|house\s+)?specials?"),
        ("wine", r"wines?(?:\s+list)?|wines?\s+by\s+the\s+glass"),
        ("beer", r"beers?|draft(?:\s+beers?)?|on\s+tap"),
        ("cocktails", r"cocktails?|mixed\s+drinks|spirits"),
    ];
    specs
        .into_iter()
        .map(|(name, body)| CategoryPattern {
            name,
            re: Regex::new(&format!(r"(?i)^(?:the\s+|our\s+)?(?:{body})(?:\s+menu)?$")).unwrap(),
        })
        .collect()
});

/// Words that mark a line as running description text.
pub static CONNECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:with|served|topped|includes?|including|and|over|tossed|drizzled|choice|side|made|fresh|accompanied|glazed|finished)\b",
    )
    .unwrap()
});

/// Connective prefixes stripped from the front of an extracted description.
pub static DESCRIPTION_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:with|includes|served)\s+").unwrap());

// ── Label tables ──

pub type LabelTable = Vec<(&'static str, Regex)>;

fn compile_table(specs: &[(&'static str, &str)]) -> LabelTable {
    specs
        .iter()
        .map(|(label, pattern)| (*label, Regex::new(&format!("(?i){pattern}")).unwrap()))
        .collect()
}

pub static DIETARY_PATTERNS: LazyLock<LabelTable> = LazyLock::new(|| {
    compile_table(&[
        ("vegan", r"\bvegan\b|\(\s*vg\s*\)"),
        ("vegetarian", r"\bvegetarian\b|\bveggie\b|\(\s*v\s*\)"),
        ("gluten_free", r"\(\s*gf\s*\)|\bgluten[\s-]?free\b|\bgf\b"),
        ("dairy_free", r"\(\s*df\s*\)|\bdairy[\s-]?free\b"),
        ("nut_free", r"\(\s*nf\s*\)|\bnut[\s-]?free\b"),
        ("keto", r"\bketo(?:[\s-]friendly)?\b"),
        ("low_carb", r"\blow[\s-]carb\b"),
        ("halal", r"\bhalal\b"),
        ("kosher", r"\bkosher\b"),
        ("organic", r"\borganic\b"),
    ])
});

pub static ALLERGEN_PATTERNS: LazyLock<LabelTable> = LazyLock::new(|| {
    compile_table(&[
        (
            "nuts",
            r"\b(?:nuts?|peanuts?|almonds?|walnuts?|pecans?|cashews?|pistachios?|hazelnuts?|macadamia)\b",
        ),
        (
            "dairy",
            r"\b(?:milk|cheese|butter|cream|dairy|yogurt|yoghurt|mozzarella|parmesan|ricotta|feta|cheddar)\b",
        ),
        (
            "gluten",
            r"\b(?:gluten|wheat|flour|bread|breaded|pasta|noodles?|croutons?|bun|toast(?:ed)?|crust|pastry|barley|rye)\b",
        ),
        ("eggs", r"\b(?:eggs?|mayo(?:nnaise)?|aioli)\b"),
        (
            "shellfish",
            r"\b(?:shellfish|shrimp|prawns?|lobster|crab|scallops?|mussels?|clams?|oysters?|crawfish)\b",
        ),
        (
            "fish",
            r"\b(?:fish|salmon|tuna|cod|halibut|trout|anchov(?:y|ies)|sea\s+bass|mahi)\b",
        ),
        ("soy", r"\b(?:soy|soya|tofu|edamame|miso)\b"),
        ("sesame", r"\b(?:sesame|tahini)\b"),
    ])
});

/// "<something>-free" claims, blanked out before allergen matching.
pub static FREE_FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-z]+[\s-]free\b").unwrap());

/// Explicit allergen notices, e.g. "(contains nuts)" or "Allergens: milk, eggs".
pub static ALLERGEN_NOTICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*(?:contains|allergens?)\b[^)]*\)|\b(?:contains|allergens?)\s*:\s*[^.;|]*")
        .unwrap()
});

/// Priority order: graded phrases (extra hot, medium, mild) outrank the bare
/// "spicy" signal, and the most intense grade wins among those.
pub static SPICE_LEVELS: LazyLock<LabelTable> = LazyLock::new(|| {
    compile_table(&[
        (
            "extra_hot",
            r"\b(?:extra|very|super)[\s-](?:hot|spicy)\b|\bfiery\b|\binferno\b|(?:🌶\x{FE0F}?\s*){3}",
        ),
        ("medium", r"\bmedium[\s-](?:hot|spicy|heat)\b|\bmedium\s+spice\b"),
        (
            "mild",
            r"\bmild(?:ly)?[\s-](?:hot|spicy|spiced|heat|spice|curry|salsa)\b|\(\s*mild\s*\)",
        ),
        ("hot", r"\bspicy\b|\bhot\s+(?:&|and)\s+spicy\b|\(\s*hot\s*\)|🌶"),
    ])
});

pub static INGREDIENTS: LazyLock<LabelTable> = LazyLock::new(|| {
    compile_table(&[
        ("tomato", r"\btomato(?:es)?\b"),
        ("basil", r"\bbasil\b"),
        ("garlic", r"\bgarlic\b"),
        ("onion", r"\bonions?\b"),
        ("mushroom", r"\bmushrooms?\b"),
        ("chicken", r"\bchicken\b"),
        ("beef", r"\bbeef\b"),
        ("pork", r"\bpork\b"),
        ("lamb", r"\blamb\b"),
        ("bacon", r"\bbacon\b"),
        ("salmon", r"\bsalmon\b"),
        ("shrimp", r"\b(?:shrimp|prawns?)\b"),
        ("tuna", r"\btuna\b"),
        ("cheese", r"\bcheese\b"),
        ("mozzarella", r"\bmozzarella\b"),
        ("parmesan", r"\bparmesan\b"),
        ("lettuce", r"\b(?:lettuce|romaine)\b"),
        ("spinach", r"\bspinach\b"),
        ("avocado", r"\bavocados?\b"),
        ("lemon", r"\blemons?\b"),
        ("lime", r"\blimes?\b"),
        ("butter", r"\bbutter\b"),
        ("rice", r"\brice\b"),
        ("potato", r"\b(?:potato(?:es)?|fries)\b"),
        ("pepper", r"\b(?:bell\s+)?peppers?\b"),
        ("egg", r"\beggs?\b"),
        ("chocolate", r"\bchocolate\b"),
        ("cream", r"\bcream\b"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tables_compile() {
        assert_eq!(PRICE_PATTERNS.len(), 4);
        assert_eq!(TITLE_CASCADE.len(), 4);
        assert_eq!(CANONICAL_HEADERS.len(), 20);
        assert!(!DIETARY_PATTERNS.is_empty());
        assert!(!ALLERGEN_PATTERNS.is_empty());
        assert_eq!(SPICE_LEVELS[0].0, "extra_hot");
        assert!(!INGREDIENTS.is_empty());
    }

    #[test]
    fn separator_requires_spaced_hyphen() {
        assert!(SEPARATOR_RE.is_match("Salmon - lemon"));
        assert!(SEPARATOR_RE.is_match("Salmon — lemon"));
        assert!(SEPARATOR_RE.is_match("Salmon....12"));
        assert!(!SEPARATOR_RE.is_match("Pan-Seared Salmon"));
    }

    #[test]
    fn canonical_headers_are_whole_line() {
        let mains = CANONICAL_HEADERS.iter().find(|c| c.name == "mains").unwrap();
        assert!(mains.re.is_match("Main Courses"));
        assert!(mains.re.is_match("ENTRÉES"));
        assert!(!mains.re.is_match("Main Courses are served with bread"));
    }

    #[test]
    fn free_from_claims() {
        assert!(FREE_FROM_RE.is_match("dairy-free"));
        assert!(FREE_FROM_RE.is_match("Gluten free"));
    }
}
