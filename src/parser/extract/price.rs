use super::super::patterns::PRICE_PATTERNS;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatch {
    /// Rounded to currency minor units.
    pub value: f64,
    /// Substring of the line the price was read from, e.g. `"$12.50"`.
    pub text: String,
}

pub fn has_price(line: &str) -> bool {
    PRICE_PATTERNS.iter().any(|p| p.re.is_match(line))
}

/// First price pattern (in table order) that matches wins. An amount that
/// does not parse counts as no price at all.
pub fn extract(line: &str) -> Option<PriceMatch> {
    let caps = PRICE_PATTERNS.iter().find_map(|p| p.re.captures(line))?;
    let text = caps.name("text")?.as_str().trim().to_string();
    let amount = caps.name("amount")?.as_str().replace(',', "");
    let value = amount.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(PriceMatch {
        value: round_minor(value),
        text,
    })
}

pub fn round_minor(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
