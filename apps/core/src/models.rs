use serde::{Deserialize, Serialize};

/// One catalog entry, converted from a raw CSV row at load time.
///
/// Optional columns that are absent or blank in the source become `None`;
/// they are never an error. A malformed or missing `id` is coerced to 0, so
/// several bad rows can share that sentinel (lookups return the first-seen
/// row, a documented quirk of the source data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Numeric product identifier; 0 when the source value was unusable.
    pub id: i64,
    /// Display title, and the strongest matching signal. Empty string when
    /// the source row had none.
    pub title: String,
    /// Free-text description; keyword source only.
    pub description: Option<String>,
    /// Variation label (e.g. color or size), matched like the title at a
    /// lower weight.
    pub variation: Option<String>,
    /// Category name, used for category search and relatedness grouping.
    pub category: Option<String>,
    /// Unit price, displayed as currency. 0.0 when absent.
    pub price: f64,
    /// Product image URL; rendering substitutes a placeholder when `None`.
    pub image_url: Option<String>,
    /// Product page URL; the title renders as plain text when `None`.
    pub product_url: Option<String>,
}

impl ProductRecord {
    /// Category comparison key (lowercased), or `None` when uncategorized.
    pub fn category_key(&self) -> Option<String> {
        self.category.as_deref().map(str::to_lowercase)
    }
}

/// The outcome of matching a message against the catalog: the selected
/// record, its heuristic score, and the ordered related records.
///
/// Borrowed from the catalog snapshot that produced it; owned entirely by
/// the call and never stored.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    /// The best-scoring catalog record.
    pub product: &'a ProductRecord,
    /// Integer strength-of-match value (not a probability).
    pub score: i64,
    /// Related records, strongest relation first, without duplicates and
    /// never containing `product` itself.
    pub related: Vec<&'a ProductRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, category: Option<&str>) -> ProductRecord {
        ProductRecord {
            id,
            title: title.to_string(),
            description: None,
            variation: None,
            category: category.map(str::to_string),
            price: 9.99,
            image_url: None,
            product_url: None,
        }
    }

    #[test]
    fn test_category_key_lowercases() {
        let r = record(1, "Widget", Some("Beauty & Health"));
        assert_eq!(r.category_key().as_deref(), Some("beauty & health"));
    }

    #[test]
    fn test_category_key_absent() {
        let r = record(1, "Widget", None);
        assert_eq!(r.category_key(), None);
    }

    #[test]
    fn test_record_serializes_optional_fields() {
        let r = record(5772, "13pcs Premium Makeup Brush Set", None);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["id"], 5772);
        assert!(json["description"].is_null());
    }
}
