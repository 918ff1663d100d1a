//! Category Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Deserialize)]
struct CountRow {
    total: usize,
}

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All active categories in display order
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_active = true ORDER BY display_order, name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let record = self.base.parse_id(TABLE, id)?;
        let category: Option<Category> = self.base.db().select(record).await?;
        Ok(category)
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let slug = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        if self.find_by_slug(&data.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category with slug '{}' already exists",
                data.slug
            )));
        }

        let parent = match &data.parent {
            Some(parent_id) => Some(self.base.parse_id(TABLE, parent_id)?),
            None => None,
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE category SET
                    name = $name,
                    slug = $slug,
                    description = $description,
                    image = $image,
                    parent = $parent,
                    display_order = $display_order,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("slug", data.slug))
            .bind(("description", data.description))
            .bind(("image", data.image))
            .bind(("parent", parent))
            .bind(("display_order", data.display_order))
            .await?;

        let created: Option<Category> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let updated: Option<Category> = self.base.db().update(record).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category; rejected while products still reference it
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM product WHERE category = $category GROUP ALL")
            .bind(("category", record.clone()))
            .await?;
        let referencing = result
            .take::<Vec<CountRow>>(0)?
            .into_iter()
            .next()
            .map(|r| r.total)
            .unwrap_or(0);
        if referencing > 0 {
            return Err(RepoError::Business(format!(
                "Cannot delete category. It is assigned to {} product(s).",
                referencing
            )));
        }

        let _: Option<Category> = self.base.db().delete(record).await?;
        Ok(true)
    }
}
