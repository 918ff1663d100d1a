//! Activity Log Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ActivityLog, ActivityQuery};
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PAGE_SIZE: usize = 50;

#[derive(Deserialize)]
struct CountRow {
    total: usize,
}

/// Paged activity listing
#[derive(Debug, serde::Serialize)]
pub struct ActivityPage {
    pub entries: Vec<ActivityLog>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

#[derive(Clone)]
pub struct ActivityLogRepository {
    base: BaseRepository,
}

impl ActivityLogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// The actor is bound separately so it lands as a record link
    pub async fn insert(&self, entry: ActivityLog) -> RepoResult<()> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE activity_log SET
                    actor = $actor,
                    actor_name = $actor_name,
                    action = $action,
                    target_type = $target_type,
                    target_id = $target_id,
                    details = $details,
                    ip = $ip,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("actor", entry.actor))
            .bind(("actor_name", entry.actor_name))
            .bind(("action", entry.action))
            .bind(("target_type", entry.target_type))
            .bind(("target_id", entry.target_id))
            .bind(("details", entry.details))
            .bind(("ip", entry.ip))
            .bind(("created_at", entry.created_at))
            .await?;
        let created: Option<ActivityLog> = result.take(0)?;
        created
            .map(|_| ())
            .ok_or_else(|| RepoError::Database("Failed to record activity".to_string()))
    }

    /// Newest-first listing with optional action / target filters
    pub async fn find_page(&self, query: ActivityQuery) -> RepoResult<ActivityPage> {
        let mut conditions: Vec<&str> = vec![];
        if query.action.is_some() {
            conditions.push("action = $action");
        }
        if query.target_type.is_some() {
            conditions.push("target_type = $target_type");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let page = query.page.unwrap_or(1).max(1);
        let select = format!(
            "SELECT * FROM activity_log{} ORDER BY created_at DESC LIMIT $limit START $start",
            where_clause
        );
        let count = format!(
            "SELECT count() AS total FROM activity_log{} GROUP ALL",
            where_clause
        );

        let mut result = self
            .base
            .db()
            .query(select)
            .query(count)
            .bind(("action", query.action))
            .bind(("target_type", query.target_type))
            .bind(("limit", PAGE_SIZE))
            .bind(("start", PAGE_SIZE * (page - 1)))
            .await?;

        let entries: Vec<ActivityLog> = result.take(0)?;
        let total = result
            .take::<Vec<CountRow>>(1)?
            .into_iter()
            .next()
            .map(|r| r.total)
            .unwrap_or(0);

        Ok(ActivityPage {
            entries,
            page,
            pages: total.div_ceil(PAGE_SIZE),
            total,
        })
    }
}
