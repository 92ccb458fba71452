//! Structured response payloads.
//!
//! The engine's output is a discriminated value; the concrete encoding is a
//! projection decided here, so an API host can ship the JSON form while the
//! chat front end uses the HTML form, both backed by the same matching
//! logic. Rendering never performs matching.
//!
//! The HTML class vocabulary (`product-card`, `product-title-link`, ...) is
//! the one the voice layer keys on to build its spoken summary; changing a
//! class name silently breaks speech output downstream.

use serde::{Deserialize, Serialize};

use crate::models::{MatchResult, ProductRecord};

/// Image shown for records without one of their own.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.jpg";

/// Maximum items shown in a category listing.
pub const CATEGORY_DISPLAY_LIMIT: usize = 6;

/// Related items included in the spoken summary; audio stays short.
const TTS_RELATED_LIMIT: usize = 2;

/// Display projection of a catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub category: Option<String>,
    pub variation: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
}

impl From<&ProductRecord> for ProductView {
    fn from(record: &ProductRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            price: record.price,
            category: record.category.clone(),
            variation: record.variation.clone(),
            image_url: record.image_url.clone(),
            product_url: record.product_url.clone(),
        }
    }
}

/// A finished reply, ready for any front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedResponse {
    /// A plain conversational reply; the fixed string passes through
    /// unchanged.
    Text { body: String },
    /// A matched product with its related items.
    ProductCard {
        primary: ProductView,
        related: Vec<ProductView>,
    },
    /// A category heading with an items block.
    CategoryList {
        category: String,
        items: Vec<ProductView>,
    },
}

impl RenderedResponse {
    pub fn text(body: impl Into<String>) -> Self {
        RenderedResponse::Text { body: body.into() }
    }

    pub fn product_card(result: &MatchResult<'_>) -> Self {
        RenderedResponse::ProductCard {
            primary: ProductView::from(result.product),
            related: result.related.iter().copied().map(ProductView::from).collect(),
        }
    }

    /// Build a category listing, capped at [`CATEGORY_DISPLAY_LIMIT`].
    pub fn category_list<'a>(
        category: impl Into<String>,
        records: impl IntoIterator<Item = &'a ProductRecord>,
    ) -> Self {
        RenderedResponse::CategoryList {
            category: category.into(),
            items: records
                .into_iter()
                .take(CATEGORY_DISPLAY_LIMIT)
                .map(ProductView::from)
                .collect(),
        }
    }

    /// Chat-markup encoding of the response.
    pub fn to_html(&self) -> String {
        match self {
            RenderedResponse::Text { body } => body.clone(),
            RenderedResponse::ProductCard { primary, related } => {
                let mut html = primary_card_html(primary);
                if !related.is_empty() {
                    html.push_str(&product_list_html(related));
                }
                html
            }
            RenderedResponse::CategoryList { category, items } => {
                let mut html = format!(
                    "<h4 class=\"category-heading\">Products in '{}'</h4>",
                    escape_html(category)
                );
                html.push_str(&product_list_html(items));
                html
            }
        }
    }

    /// Short spoken form of the response, for the voice pipeline.
    pub fn tts_summary(&self) -> String {
        match self {
            RenderedResponse::Text { body } => body.clone(),
            RenderedResponse::ProductCard { primary, related } => {
                let mut summary =
                    format!("{}, price {} dollars.", primary.title, format_amount(primary.price));
                if !related.is_empty() {
                    let spoken: Vec<String> = related
                        .iter()
                        .take(TTS_RELATED_LIMIT)
                        .map(|item| {
                            format!("{}, price {} dollars", item.title, format_amount(item.price))
                        })
                        .collect();
                    summary.push_str(" Related products: ");
                    summary.push_str(&spoken.join("; "));
                    summary.push('.');
                }
                summary
            }
            RenderedResponse::CategoryList { category, items } => {
                let titles: Vec<&str> =
                    items.iter().take(TTS_RELATED_LIMIT).map(|i| i.title.as_str()).collect();
                let mut summary =
                    format!("In the '{}' category, we have: {}", category, titles.join(", "));
                if items.len() > TTS_RELATED_LIMIT {
                    summary.push_str(", and more");
                }
                summary.push('.');
                summary
            }
        }
    }
}

fn primary_card_html(view: &ProductView) -> String {
    let mut html = String::from("<div class=\"product-card\">");
    html.push_str(&format!(
        "<img class=\"product-image\" src=\"{}\" alt=\"{}\">",
        escape_html(view.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)),
        escape_html(&view.title)
    ));
    html.push_str(&title_html(view, "product-title-link", "product-title"));
    html.push_str(&format!(
        "<p class=\"product-price\">{}</p>",
        format_price(view.price)
    ));
    if let Some(category) = view.category.as_deref() {
        html.push_str(&format!(
            "<p class=\"product-category\">Category: {}</p>",
            escape_html(category)
        ));
    }
    html.push_str("</div>");
    html
}

fn product_list_html(items: &[ProductView]) -> String {
    let mut html = String::from("<div class=\"product-list\">");
    for item in items {
        html.push_str("<div class=\"product-item\">");
        html.push_str(&format!(
            "<img class=\"product-item-image\" src=\"{}\" alt=\"{}\">",
            escape_html(item.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)),
            escape_html(&item.title)
        ));
        html.push_str(&title_html(item, "product-item-title", "product-item-title"));
        html.push_str(&format!(
            "<p class=\"product-item-price\">{}</p>",
            format_price(item.price)
        ));
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

/// Title as a link when the record has a URL, plain text otherwise.
fn title_html(view: &ProductView, link_class: &str, span_class: &str) -> String {
    match view.product_url.as_deref() {
        Some(url) => format!(
            "<a class=\"{}\" href=\"{}\">{}</a>",
            link_class,
            escape_html(url),
            escape_html(&view.title)
        ),
        None => format!("<span class=\"{}\">{}</span>", span_class, escape_html(&view.title)),
    }
}

/// Price as displayed currency.
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Price as spoken, without the currency sign.
fn format_amount(price: f64) -> String {
    format!("{:.2}", price)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
