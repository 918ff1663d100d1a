//! One-time backfill: normalize legacy catalog references.
//!
//! Products imported from the previous schema tagged category and brand with
//! denormalized name strings. This migration resolves those names to real
//! `category` / `brand` records (creating them when missing), writes the
//! reference, and clears the legacy field. Runs at startup and exits
//! immediately once nothing legacy remains.

use crate::db::models::{Product, BrandCreate, CategoryCreate};
use crate::db::repository::{BrandRepository, CategoryRepository, RepoError, RepoResult};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

/// Run the backfill if any product still carries a legacy name string
pub async fn backfill_catalog_refs(db: &Surreal<Db>) -> RepoResult<()> {
    let mut result = db
        .query("SELECT * FROM product WHERE legacy_category != NONE OR legacy_brand != NONE")
        .await?;
    let legacy: Vec<Product> = result.take(0)?;

    if legacy.is_empty() {
        return Ok(());
    }

    tracing::info!(
        count = legacy.len(),
        "Legacy catalog name strings detected, backfilling references..."
    );

    let categories = CategoryRepository::new(db.clone());
    let brands = BrandRepository::new(db.clone());

    for product in legacy {
        let id = product
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Legacy product has no id".to_string()))?;

        let category = match &product.legacy_category {
            Some(name) => Some(resolve_category(&categories, name).await?),
            None => None,
        };
        let brand = match &product.legacy_brand {
            Some(name) => Some(resolve_brand(&brands, name).await?),
            None => None,
        };

        db.query(
            r#"UPDATE $product SET
                category = $category ?? category,
                brand = $brand ?? brand,
                legacy_category = NONE,
                legacy_brand = NONE"#,
        )
        .bind(("product", id.clone()))
        .bind(("category", category))
        .bind(("brand", brand))
        .await?;

        tracing::debug!(product = %id, "Backfilled catalog references");
    }

    tracing::info!("Legacy catalog backfill complete");
    Ok(())
}

async fn resolve_category(
    repo: &CategoryRepository,
    name: &str,
) -> RepoResult<RecordId> {
    let slug = slugify(name);
    if let Some(existing) = repo.find_by_slug(&slug).await? {
        return existing
            .id
            .ok_or_else(|| RepoError::Database("Category has no id".to_string()));
    }

    let created = repo
        .create(CategoryCreate {
            name: name.to_string(),
            slug,
            description: String::new(),
            image: String::new(),
            parent: None,
            display_order: 0,
        })
        .await?;
    created
        .id
        .ok_or_else(|| RepoError::Database("Category has no id".to_string()))
}

async fn resolve_brand(repo: &BrandRepository, name: &str) -> RepoResult<RecordId> {
    let slug = slugify(name);
    if let Some(existing) = repo.find_by_slug(&slug).await? {
        return existing
            .id
            .ok_or_else(|| RepoError::Database("Brand has no id".to_string()));
    }

    let created = repo
        .create(BrandCreate {
            name: name.to_string(),
            slug,
            description: String::new(),
            logo: String::new(),
            website: String::new(),
            is_verified: false,
        })
        .await?;
    created
        .id
        .ok_or_else(|| RepoError::Database("Brand has no id".to_string()))
}

fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Dry Fruits"), "dry-fruits");
        assert_eq!(slugify("  Herbs & Teas "), "herbs-teas");
    }

    #[tokio::test]
    async fn test_backfill_resolves_and_clears_legacy_names() {
        let db = DbService::open_in_memory().await.expect("db");

        db.query(
            r#"CREATE product SET
                name = 'Organic Almonds',
                description = '',
                image = '',
                product_type = 'Dry Fruits',
                certifications = [],
                weight = 500.0,
                unit = 'g',
                price = '12.50',
                count_in_stock = 20,
                legacy_category = 'Dry Fruits',
                legacy_brand = 'Vital Farms',
                created_at = 0"#,
        )
        .await
        .expect("insert");

        backfill_catalog_refs(&db).await.expect("backfill");

        let products: Vec<Product> = db
            .query("SELECT * FROM product")
            .await
            .expect("query")
            .take(0)
            .expect("take");
        let product = &products[0];
        assert!(product.legacy_category.is_none());
        assert!(product.legacy_brand.is_none());
        let category_ref = product.category.clone().expect("category ref");
        assert_eq!(category_ref.table(), "category");

        let category = CategoryRepository::new(db.clone())
            .find_by_slug("dry-fruits")
            .await
            .expect("find")
            .expect("created");
        assert_eq!(category.name, "Dry Fruits");

        // Second run is a no-op
        backfill_catalog_refs(&db).await.expect("idempotent");
    }
}
