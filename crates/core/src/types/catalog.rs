//! Catalog entries: categories and products.
//!
//! Both are read-only from the storefront's point of view. They are loaded
//! from the catalog repository and never written back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product category, addressed in URLs by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub sku: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Free-form specification table (e.g. "Material" -> "Polyester").
    #[serde(default)]
    pub specs: BTreeMap<String, serde_json::Value>,
    /// Available sizes, in display order. Empty when the product is one-size.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Available colors, in display order.
    #[serde(default)]
    pub colors: Vec<String>,
}

impl Product {
    /// Whether the shopper has to pick a size before adding to the cart.
    #[must_use]
    pub fn requires_size(&self) -> bool {
        !self.sizes.is_empty()
    }

    /// Spec table rendered as text rows. String values are shown without quotes.
    #[must_use]
    pub fn spec_rows(&self) -> Vec<(String, String)> {
        self.specs
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect()
    }
}

/// Product listing filter.
///
/// An empty filter lists the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring of the product name.
    pub name_contains: Option<String>,
}

impl ProductFilter {
    #[must_use]
    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Restrict to names containing `query`. Blank queries are ignored.
    #[must_use]
    pub fn named(mut self, query: &str) -> Self {
        let query = query.trim();
        self.name_contains = (!query.is_empty()).then(|| query.to_owned());
        self
    }

    /// Whether `product` passes this filter.
    ///
    /// Repositories that cannot push the filter down to a query use this.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category_id) = self.category_id
            && product.category_id != Some(category_id)
        {
            return false;
        }
        match &self.name_contains {
            Some(needle) => product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }
}
