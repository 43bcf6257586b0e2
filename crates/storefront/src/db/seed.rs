//! Catalog seed files.
//!
//! A seed is a YAML document listing categories and their products:
//!
//! ```yaml
//! categories:
//!   - name: Outerwear
//!     slug: outerwear
//!     products:
//!       - name: Field Jacket
//!         sku: OW-100
//!         price: "89.99"
//!         sizes: [S, M, L]
//! ```
//!
//! Seeding is idempotent: categories upsert on slug, products on sku.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use sqlx::types::Json;

use quartermaster_core::{CategoryId, ProductId};

use super::RepositoryError;

/// Top-level seed document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub specs: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Counts of rows written by a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub products: usize,
}

impl CatalogSeed {
    /// Parse a YAML seed document.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the document does not match the seed shape.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Upsert every category and product into `PostgreSQL`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction is rolled back.
    pub async fn apply(&self, pool: &PgPool) -> Result<SeedReport, RepositoryError> {
        let mut tx = pool.begin().await?;
        let mut report = SeedReport::default();

        for category in &self.categories {
            let category_id = sqlx::query_scalar::<_, CategoryId>(
                r"
                INSERT INTO categories (name, slug)
                VALUES ($1, $2)
                ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                ",
            )
            .bind(&category.name)
            .bind(&category.slug)
            .fetch_one(&mut *tx)
            .await?;
            report.categories += 1;

            for product in &category.products {
                sqlx::query_scalar::<_, ProductId>(
                    r"
                    INSERT INTO products
                        (category_id, name, description, price, sku, image_url, specs, sizes, colors)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    ON CONFLICT (sku) DO UPDATE SET
                        category_id = EXCLUDED.category_id,
                        name = EXCLUDED.name,
                        description = EXCLUDED.description,
                        price = EXCLUDED.price,
                        image_url = EXCLUDED.image_url,
                        specs = EXCLUDED.specs,
                        sizes = EXCLUDED.sizes,
                        colors = EXCLUDED.colors
                    RETURNING id
                    ",
                )
                .bind(category_id)
                .bind(&product.name)
                .bind(product.description.as_deref())
                .bind(product.price)
                .bind(&product.sku)
                .bind(product.image_url.as_deref())
                .bind(Json(&product.specs))
                .bind(&product.sizes)
                .bind(&product.colors)
                .fetch_one(&mut *tx)
                .await?;
                report.products += 1;
            }
        }

        tx.commit().await?;
        tracing::info!(
            categories = report.categories,
            products = report.products,
            "Catalog seeded"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        let seed = CatalogSeed::from_yaml(
            r#"
categories:
  - name: Outerwear
    slug: outerwear
    products:
      - name: Field Jacket
        sku: OW-100
        price: "89.99"
        specs:
          Material: Nylon
        sizes: [S, M, L]
  - name: Bags
    slug: bags
"#,
        )
        .unwrap();

        assert_eq!(seed.categories.len(), 2);
        let jacket = &seed.categories[0].products[0];
        assert_eq!(jacket.price, Decimal::new(8999, 2));
        assert_eq!(jacket.sizes, vec!["S", "M", "L"]);
        assert_eq!(jacket.specs["Material"], "Nylon");
        assert!(seed.categories[1].products.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_price() {
        let result = CatalogSeed::from_yaml(
            r"
categories:
  - name: Bags
    slug: bags
    products:
      - name: Tote
        sku: BG-1
",
        );
        assert!(result.is_err());
    }
}
