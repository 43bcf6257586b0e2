//! Seed the catalog from a YAML file.
//!
//! Categories are upserted by slug and products by SKU, so the command can be
//! re-run after editing the file.

use std::path::Path;

use tracing::info;

use quartermaster_storefront::db::{self, CatalogSeed};

/// Seed categories and products from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any database
/// write fails. Nothing is written unless the whole file applies.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    // Verify file exists
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Parse before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let seed = CatalogSeed::from_yaml(&content)?;

    info!(categories = seed.categories.len(), "Parsed catalog");

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let report = seed.apply(&pool).await?;

    info!("Seeding complete!");
    info!("  Categories upserted: {}", report.categories);
    info!("  Products upserted: {}", report.products);

    Ok(())
}
