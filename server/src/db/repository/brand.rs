//! Brand Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Brand, BrandCreate, BrandUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "brand";

#[derive(Clone)]
pub struct BrandRepository {
    base: BaseRepository,
}

impl BrandRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Brand>> {
        let brands: Vec<Brand> = self
            .base
            .db()
            .query("SELECT * FROM brand ORDER BY name")
            .await?
            .take(0)?;
        Ok(brands)
    }

    /// Verified brands, surfaced separately on the storefront
    pub async fn find_verified(&self) -> RepoResult<Vec<Brand>> {
        let brands: Vec<Brand> = self
            .base
            .db()
            .query("SELECT * FROM brand WHERE is_verified = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(brands)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Brand>> {
        let record = self.base.parse_id(TABLE, id)?;
        let brand: Option<Brand> = self.base.db().select(record).await?;
        Ok(brand)
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Brand>> {
        let slug = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM brand WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug))
            .await?;
        let brands: Vec<Brand> = result.take(0)?;
        Ok(brands.into_iter().next())
    }

    pub async fn create(&self, data: BrandCreate) -> RepoResult<Brand> {
        if self.find_by_slug(&data.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Brand with slug '{}' already exists",
                data.slug
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE brand SET
                    name = $name,
                    slug = $slug,
                    description = $description,
                    logo = $logo,
                    website = $website,
                    is_verified = $is_verified
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("slug", data.slug))
            .bind(("description", data.description))
            .bind(("logo", data.logo))
            .bind(("website", data.website))
            .bind(("is_verified", data.is_verified))
            .await?;

        let created: Option<Brand> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create brand".to_string()))
    }

    pub async fn update(&self, id: &str, data: BrandUpdate) -> RepoResult<Brand> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Brand {} not found", id)))?;

        let updated: Option<Brand> = self.base.db().update(record).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Brand {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Brand {} not found", id)))?;

        let _: Option<Brand> = self.base.db().delete(record).await?;
        Ok(true)
    }
}
