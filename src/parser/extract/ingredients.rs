use super::super::patterns::INGREDIENTS;

/// Known ingredients mentioned in `text`, in vocabulary order.
pub fn extract(text: &str) -> Vec<String> {
    INGREDIENTS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Append ingredients not already present, keeping first-seen order.
pub fn merge(into: &mut Vec<String>, more: Vec<String>) {
    for name in more {
        if !into.contains(&name) {
            into.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_vocabulary_words() {
        assert_eq!(
            extract("Toasted bread with Tomatoes, garlic and basil"),
            vec!["tomato", "basil", "garlic"]
        );
        assert!(extract("Tiramisu").is_empty());
    }

    #[test]
    fn deduplicates_synonyms() {
        assert_eq!(extract("shrimp and prawns"), vec!["shrimp"]);
    }

    #[test]
    fn merge_keeps_existing_order() {
        let mut v = vec!["beef".to_string()];
        merge(&mut v, vec!["onion".to_string(), "beef".to_string()]);
        assert_eq!(v, vec!["beef", "onion"]);
    }
}
