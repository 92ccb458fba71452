//! Related-product selection.
//!
//! Two tiers: records sharing the matched record's category come first, in
//! catalog order; if that underfills the limit, remaining records are ranked
//! by how many content keywords they share with the matched record. Category
//! alone can pair unrelated items in a small catalog, so the lexical tier is
//! a refinement, not a replacement.

use std::collections::HashSet;

use super::keywords;
use crate::catalog::Catalog;
use crate::models::ProductRecord;

/// Pick up to `limit` records related to `matched`.
///
/// The result never contains the matched record, holds no duplicate ids,
/// and keeps tier order: same-category records first (catalog order), then
/// keyword-overlap records (overlap descending, catalog order on ties).
pub fn related_products<'a>(
    matched: &ProductRecord,
    catalog: &'a Catalog,
    limit: usize,
) -> Vec<&'a ProductRecord> {
    if limit == 0 {
        return Vec::new();
    }

    let mut picked: Vec<&ProductRecord> = Vec::new();
    let mut picked_ids: HashSet<i64> = HashSet::new();
    picked_ids.insert(matched.id);

    // Tier 1: taxonomic relatedness.
    if let Some(category_key) = matched.category_key() {
        for record in catalog.all() {
            if picked.len() >= limit {
                break;
            }
            if record.category_key().as_deref() == Some(category_key.as_str())
                && picked_ids.insert(record.id)
            {
                picked.push(record);
            }
        }
    }

    // Tier 2: lexical similarity over the matched record's keyword profile.
    if picked.len() < limit {
        let profile = keyword_profile(matched);
        let mut scored: Vec<(usize, &ProductRecord)> = catalog
            .all()
            .iter()
            .filter(|r| !picked_ids.contains(&r.id))
            .map(|r| (keyword_overlap(r, &profile), r))
            .filter(|&(overlap, _)| overlap > 0)
            .collect();
        // Stable sort keeps catalog order within equal overlap counts.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        for (_, record) in scored {
            if picked.len() >= limit {
                break;
            }
            if picked_ids.insert(record.id) {
                picked.push(record);
            }
        }
    }

    picked
}

/// The matched record's content keywords across title, description, and
/// variation, with stopwords and short tokens removed.
fn keyword_profile(record: &ProductRecord) -> HashSet<String> {
    let mut text = record.title.clone();
    if let Some(description) = record.description.as_deref() {
        text.push(' ');
        text.push_str(description);
    }
    if let Some(variation) = record.variation.as_deref() {
        text.push(' ');
        text.push_str(variation);
    }
    keywords::content_keywords(&text)
}

fn keyword_overlap(record: &ProductRecord, profile: &HashSet<String>) -> usize {
    keyword_profile(record)
        .iter()
        .filter(|k| profile.contains(*k))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, description: Option<&str>, category: Option<&str>) -> ProductRecord {
        ProductRecord {
            id,
            title: title.to_string(),
            description: description.map(str::to_string),
            variation: None,
            category: category.map(str::to_string),
            price: 5.0,
            image_url: None,
            product_url: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            record(1, "Makeup Brush Set", Some("premium brush kit"), Some("Beauty")),
            record(2, "Makeup Sponge", Some("soft blending sponge"), Some("Beauty")),
            record(3, "Electric Shaver", Some("travel trimmer"), Some("Electronics")),
            record(4, "Brush Cleaner", Some("cleans makeup brush heads"), Some("Tools")),
            record(5, "Eyeliner Pen", Some("smooth makeup liner"), Some("Beauty")),
        ])
    }

    #[test]
    fn test_same_category_comes_first_in_catalog_order() {
        let catalog = catalog();
        let matched = catalog.by_id(1).unwrap();
        let related = related_products(matched, &catalog, 4);
        let ids: Vec<i64> = related.iter().map(|r| r.id).collect();
        // Beauty records 2 and 5 first, then the keyword-overlap tier
        // ("makeup brush" shared with record 4).
        assert_eq!(ids, vec![2, 5, 4]);
    }

    #[test]
    fn test_excludes_matched_record() {
        let catalog = catalog();
        let matched = catalog.by_id(2).unwrap();
        let related = related_products(matched, &catalog, 5);
        assert!(related.iter().all(|r| r.id != 2));
    }

    #[test]
    fn test_limit_is_respected() {
        let catalog = catalog();
        let matched = catalog.by_id(1).unwrap();
        assert!(related_products(matched, &catalog, 1).len() <= 1);
        assert!(related_products(matched, &catalog, 0).is_empty());
    }

    #[test]
    fn test_category_matching_is_case_insensitive() {
        let catalog = Catalog::from_records(vec![
            record(1, "A", None, Some("beauty")),
            record(2, "B", None, Some("Beauty")),
        ]);
        let matched = catalog.by_id(1).unwrap();
        let related = related_products(matched, &catalog, 3);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, 2);
    }

    #[test]
    fn test_no_duplicate_ids_even_with_sentinel_collisions() {
        // Malformed rows collapse onto id 0; the related list must still
        // hold distinct ids.
        let catalog = Catalog::from_records(vec![
            record(7, "Makeup Brush", Some("brush"), Some("Beauty")),
            record(0, "Makeup Mirror", Some("brush holder mirror"), Some("Beauty")),
            record(0, "Makeup Bag", Some("brush bag"), Some("Beauty")),
        ]);
        let matched = catalog.by_id(7).unwrap();
        let related = related_products(matched, &catalog, 5);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, 0);
    }

    #[test]
    fn test_zero_overlap_records_do_not_pad() {
        let catalog = Catalog::from_records(vec![
            record(1, "Makeup Brush", None, None),
            record(2, "Garden Hose", Some("watering"), None),
        ]);
        let matched = catalog.by_id(1).unwrap();
        assert!(related_products(matched, &catalog, 4).is_empty());
    }

    #[test]
    fn test_uncategorized_match_uses_keyword_tier_only() {
        let catalog = Catalog::from_records(vec![
            record(1, "Travel Shaver", Some("portable trimmer"), None),
            record(2, "Beard Trimmer", Some("portable shaver kit"), Some("Grooming")),
            record(3, "Desk Lamp", Some("led light"), Some("Lighting")),
        ]);
        let matched = catalog.by_id(1).unwrap();
        let related = related_products(matched, &catalog, 4);
        let ids: Vec<i64> = related.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
