//! Admin activity logging
//!
//! Records who did what in the admin console. Writes are fire-and-forget:
//! the handler's response never waits on (or fails because of) the log
//! insert; failures are logged and dropped.

use crate::auth::Identity;
use crate::db::models::ActivityLog;
use crate::db::repository::ActivityLogRepository;
use crate::utils::time::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ActivityService {
    db: Surreal<Db>,
}

impl ActivityService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Record an admin action without blocking the caller
    pub fn record(
        &self,
        actor: &Identity,
        action: &str,
        target_type: &str,
        target_id: Option<String>,
        details: serde_json::Value,
        ip: Option<String>,
    ) {
        let entry = ActivityLog {
            id: None,
            actor: Some(actor.id.clone()),
            actor_name: actor.name.clone(),
            action: action.to_string(),
            target_type: target_type.to_string(),
            target_id,
            details,
            ip,
            created_at: now_millis(),
        };

        let repo = ActivityLogRepository::new(self.db.clone());
        let action = entry.action.clone();
        tokio::spawn(async move {
            if let Err(e) = repo.insert(entry).await {
                tracing::warn!(action = %action, error = %e, "Failed to record activity");
            }
        });
    }
}
