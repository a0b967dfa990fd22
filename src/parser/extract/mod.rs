pub mod ingredients;
pub mod price;
pub mod tags;
pub mod text;

use crate::model::MenuItem;

/// Build a menu item from the line that opened it. Confidence is filled in
/// later by the scorer once the item is complete.
pub fn item_from_line(line: &str, category: &str) -> MenuItem {
    let line = line.trim();
    let price = price::extract(line);
    let price_text = price.as_ref().map(|p| p.text.clone()).unwrap_or_default();
    let title = text::title(line, &price_text);
    let description = text::description(line, &title, &price_text);

    MenuItem {
        title,
        description,
        price: price.map(|p| p.value),
        price_text,
        category: category.to_string(),
        dietary_tags: tags::dietary(line),
        allergens: tags::allergens(line),
        spice_level: tags::spice_level(line),
        ingredients: ingredients::extract(line),
        confidence: 0.0,
    }
}

/// Fold a description continuation line into an open item.
pub fn append_description(item: &mut MenuItem, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if item.description.is_empty() {
        item.description = line.to_string();
    } else {
        item.description.push(' ');
        item.description.push_str(line);
    }

    item.dietary_tags.extend(tags::dietary(line));
    item.allergens.extend(tags::allergens(line));
    if item.spice_level.is_none() {
        item.spice_level = tags::spice_level(line);
    }
    ingredients::merge(&mut item.ingredients, ingredients::extract(line));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_from_priced_line() {
        let item = item_from_line("Grilled Salmon - Lemon butter sauce $28 (GF)", "Main Courses");
        assert_eq!(item.title, "Grilled Salmon");
        assert_eq!(item.description, "Lemon butter sauce");
        assert_eq!(item.price, Some(28.0));
        assert_eq!(item.price_text, "$28");
        assert_eq!(item.category, "Main Courses");
        assert!(item.dietary_tags.contains("gluten_free"));
        assert!(item.allergens.contains("fish"));
        assert!(item.allergens.contains("dairy"));
        assert_eq!(item.ingredients, vec!["salmon", "lemon", "butter"]);
    }

    #[test]
    fn item_without_price() {
        let item = item_from_line("Margherita Pizza", "Pizza");
        assert_eq!(item.title, "Margherita Pizza");
        assert_eq!(item.price, None);
        assert!(item.price_text.is_empty());
    }

    #[test]
    fn continuation_unions_tags() {
        let mut item = item_from_line("Thai Curry $15", "Mains");
        append_description(&mut item, "coconut milk, peanuts, very spicy");
        append_description(&mut item, "vegan on request with tofu");
        assert_eq!(
            item.description,
            "coconut milk, peanuts, very spicy vegan on request with tofu"
        );
        assert!(item.allergens.contains("nuts"));
        assert!(item.allergens.contains("dairy"));
        assert!(item.allergens.contains("soy"));
        assert!(item.dietary_tags.contains("vegan"));
        assert_eq!(item.spice_level.as_deref(), Some("extra_hot"));
    }
}
