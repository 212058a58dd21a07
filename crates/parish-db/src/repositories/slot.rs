//! PostgreSQL implementation of SlotRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;
use uuid::Uuid;

use parish_core::traits::{RepoResult, SlotRepository};
use parish_core::{DomainError, EventId, Slot, SlotId};

use crate::models::SlotModel;

use super::error::{convert_all, map_db_error};

const SLOT_COLUMNS: &str = "id, event_id, name, capacity, notes, created_at";

/// PostgreSQL implementation of SlotRepository
#[derive(Clone)]
pub struct PgSlotRepository {
    pool: PgPool,
}

impl PgSlotRepository {
    /// Create a new PgSlotRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Capacity as stored in the `INTEGER` column
fn capacity_column(slot: &Slot) -> RepoResult<i32> {
    i32::try_from(slot.capacity).map_err(|_| DomainError::InvalidCapacity(i64::from(slot.capacity)))
}

pub(super) async fn insert_slot(conn: &mut PgConnection, slot: &Slot) -> RepoResult<()> {
    let capacity = capacity_column(slot)?;
    sqlx::query(
        r"
        INSERT INTO slots (id, event_id, name, capacity, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(slot.id.into_uuid())
    .bind(slot.event_id.into_uuid())
    .bind(&slot.name)
    .bind(capacity)
    .bind(&slot.notes)
    .bind(slot.created_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db| db.is_foreign_key_violation())
        {
            DomainError::EventNotFound(slot.event_id)
        } else {
            map_db_error(e)
        }
    })?;

    Ok(())
}

#[async_trait]
impl SlotRepository for PgSlotRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: SlotId) -> RepoResult<Option<Slot>> {
        let sql = format!("SELECT {SLOT_COLUMNS} FROM slots WHERE id = $1");
        let result = sqlx::query_as::<_, SlotModel>(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Slot::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_event(&self, event_id: EventId) -> RepoResult<Vec<Slot>> {
        self.find_by_events(&[event_id]).await
    }

    #[instrument(skip(self, event_ids), fields(count = event_ids.len()))]
    async fn find_by_events(&self, event_ids: &[EventId]) -> RepoResult<Vec<Slot>> {
        let ids: Vec<Uuid> = event_ids.iter().map(|id| id.into_uuid()).collect();
        let sql = format!(
            "SELECT {SLOT_COLUMNS} FROM slots WHERE event_id = ANY($1) ORDER BY created_at, name, id"
        );
        let rows = sqlx::query_as::<_, SlotModel>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self, slot), fields(slot_id = %slot.id, event_id = %slot.event_id))]
    async fn create(&self, slot: &Slot) -> RepoResult<()> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;
        insert_slot(&mut conn, slot).await
    }

    #[instrument(skip(self, slot), fields(slot_id = %slot.id))]
    async fn update(&self, slot: &Slot) -> RepoResult<()> {
        let capacity = capacity_column(slot)?;
        let result = sqlx::query(
            r"
            UPDATE slots
            SET name = $2, capacity = $3, notes = $4
            WHERE id = $1
            ",
        )
        .bind(slot.id.into_uuid())
        .bind(&slot.name)
        .bind(capacity)
        .bind(&slot.notes)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SlotNotFound(slot.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: SlotId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM assignments WHERE slot_id = $1")
            .bind(id.into_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SlotNotFound(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSlotRepository>();
    }

    #[test]
    fn test_capacity_column_never_wraps() {
        let template = parish_core::SlotTemplate::new("Usher".to_string(), 3, None).unwrap();
        let mut slot = Slot::from_template(EventId::new(), &template);
        assert_eq!(capacity_column(&slot).unwrap(), 3);

        slot.capacity = 3_000_000_000;
        assert!(matches!(
            capacity_column(&slot),
            Err(DomainError::InvalidCapacity(3_000_000_000))
        ));
    }
}
