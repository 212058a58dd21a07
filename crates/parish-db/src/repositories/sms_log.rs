//! PostgreSQL implementation of SmsLogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use parish_core::traits::{RepoResult, SmsLogRepository};
use parish_core::{SmsLogEntry, UserId};

use crate::models::SmsLogModel;

use super::error::{convert_all, map_db_error};

/// PostgreSQL implementation of SmsLogRepository
#[derive(Clone)]
pub struct PgSmsLogRepository {
    pool: PgPool,
}

impl PgSmsLogRepository {
    /// Create a new PgSmsLogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SmsLogRepository for PgSmsLogRepository {
    #[instrument(skip(self, entry), fields(status = entry.status.as_str()))]
    async fn create(&self, entry: &SmsLogEntry) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO sms_log (id, user_id, phone, message_type, message_body, provider_id,
                                 status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(entry.id.into_uuid())
        .bind(entry.user_id.map(UserId::into_uuid))
        .bind(entry.phone.as_str())
        .bind(entry.message_type.as_str())
        .bind(&entry.body)
        .bind(&entry.provider_id)
        .bind(entry.status.as_str())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<SmsLogEntry>> {
        let rows = sqlx::query_as::<_, SmsLogModel>(
            r"
            SELECT id, user_id, phone, message_type, message_body, provider_id, status, created_at
            FROM sms_log
            ORDER BY created_at DESC, id
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }
}
