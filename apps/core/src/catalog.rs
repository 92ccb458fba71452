//! Product catalog store.
//!
//! Loads the flat product table once at startup, converts each loosely-typed
//! CSV row into a [`ProductRecord`], and exposes read-only lookups over the
//! result. The catalog is immutable after load; concurrent readers share a
//! snapshot through [`CatalogHandle`], which also provides the atomic-swap
//! reload seam.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::ProductRecord;

/// Errors raised while loading the product table.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source file is missing or unreadable.
    #[error("Catalog source unreadable: {0}")]
    Io(#[from] io::Error),

    /// The source file exists but is not a well-formed CSV table.
    #[error("Catalog source malformed: {0}")]
    Csv(#[from] csv::Error),
}

/// Canonical form for a CSV header: trimmed, lowercased, spaces collapsed
/// to underscores ("Image-URL" -> "image-url", " Title " -> "title").
fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// A trimmed cell value, with blank cells treated as absent.
fn opt_cell(value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => None,
    }
}

/// The in-memory product catalog. Records keep their source-table order,
/// which matching code relies on for stable tie-breaking.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    /// Load the catalog from a CSV product table.
    ///
    /// Column names are normalized before lookup; both `image-url` and
    /// `image_url` (and `url` / `product_url`) spellings are accepted.
    /// Unparseable `id` cells are coerced to 0 rather than rejected, so
    /// several malformed rows can collapse onto the same sentinel id.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(file);

        let columns: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_header(name), idx))
            .collect();
        let col = |names: &[&str]| names.iter().find_map(|n| columns.get(*n)).copied();

        let id_col = col(&["id"]);
        let title_col = col(&["title"]);
        let description_col = col(&["description"]);
        let variation_col = col(&["variation"]);
        let category_col = col(&["category"]);
        let price_col = col(&["price"]);
        let image_col = col(&["image-url", "image_url"]);
        let url_col = col(&["url", "product_url"]);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let cell = |idx: Option<usize>| idx.and_then(|i| opt_cell(row.get(i)));

            records.push(ProductRecord {
                id: cell(id_col)
                    .and_then(|v| v.parse::<i64>().ok())
                    .unwrap_or(0),
                title: cell(title_col).unwrap_or_default(),
                description: cell(description_col),
                variation: cell(variation_col),
                category: cell(category_col),
                price: cell(price_col)
                    .and_then(|v| v.parse::<f64>().ok())
                    .unwrap_or(0.0),
                image_url: cell(image_col),
                product_url: cell(url_col),
            });
        }

        info!(
            "Products loaded successfully from: {} ({} records)",
            path.display(),
            records.len()
        );
        Ok(Self { records })
    }

    /// Load the catalog, degrading to an empty one on failure.
    ///
    /// A host that must not die at startup uses this seam; every later call
    /// then takes the documented "no product data" fallback paths.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    "Failed to load product catalog from {}: {}. Starting with an empty catalog.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Build a catalog directly from records. Test seam; keeps the given order.
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    /// All records in stable source-table order.
    pub fn all(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Look up a record by id. With duplicate ids (the malformed-row
    /// sentinel 0 in particular) the first-seen record wins.
    pub fn by_id(&self, id: i64) -> Option<&ProductRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Distinct category names in first-seen order, skipping records
    /// without one. Names differing only in case count as one category.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if let Some(category) = record.category.as_deref() {
                let key = category.to_lowercase();
                if !seen.contains(&key) {
                    seen.push(key);
                    names.push(category);
                }
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cloneable shared handle over the catalog.
///
/// `snapshot` hands out an `Arc` to one consistent table; `reload` swaps a
/// freshly loaded catalog in atomically, so in-flight matches never observe
/// a half-updated table. The write lock guards only the pointer swap.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    inner: Arc<RwLock<Arc<Catalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// The current catalog snapshot.
    pub fn snapshot(&self) -> Arc<Catalog> {
        // Lock poisoning is irrecoverable state; panicking is acceptable here.
        Arc::clone(&self.inner.read().expect("catalog lock poisoned"))
    }

    /// Replace the catalog with a fresh load from `path`.
    ///
    /// On failure the previous catalog stays in place and the error is
    /// returned to the caller.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let fresh = Catalog::load(path)?;
        let mut slot = self.inner.write().expect("catalog lock poisoned");
        *slot = Arc::new(fresh);
        Ok(())
    }
}

/// Default catalog location, relative to the working directory.
pub fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/products.csv")
}
