//! Certification Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Certification, CertificationCreate, CertificationUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "certification";

#[derive(Clone)]
pub struct CertificationRepository {
    base: BaseRepository,
}

impl CertificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Certification>> {
        let certifications: Vec<Certification> = self
            .base
            .db()
            .query("SELECT * FROM certification WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(certifications)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Certification>> {
        let record = self.base.parse_id(TABLE, id)?;
        let certification: Option<Certification> = self.base.db().select(record).await?;
        Ok(certification)
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Certification>> {
        let slug = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM certification WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug))
            .await?;
        let certifications: Vec<Certification> = result.take(0)?;
        Ok(certifications.into_iter().next())
    }

    pub async fn create(&self, data: CertificationCreate) -> RepoResult<Certification> {
        if self.find_by_slug(&data.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Certification with slug '{}' already exists",
                data.slug
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE certification SET
                    name = $name,
                    slug = $slug,
                    description = $description,
                    logo = $logo,
                    issuer = $issuer,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("slug", data.slug))
            .bind(("description", data.description))
            .bind(("logo", data.logo))
            .bind(("issuer", data.issuer))
            .await?;

        let created: Option<Certification> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create certification".to_string()))
    }

    pub async fn update(&self, id: &str, data: CertificationUpdate) -> RepoResult<Certification> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Certification {} not found", id)))?;

        let updated: Option<Certification> = self.base.db().update(record).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Certification {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Certification {} not found", id)))?;

        let _: Option<Certification> = self.base.db().delete(record).await?;
        Ok(true)
    }
}
