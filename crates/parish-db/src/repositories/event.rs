//! PostgreSQL implementation of EventRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use parish_core::traits::{EventQuery, EventRepository, RepoResult};
use parish_core::{DomainError, Event, EventId, EventSeries};

use crate::models::EventModel;

use super::error::{convert_all, map_db_error};
use super::slot::insert_slot;

pub(super) const EVENT_COLUMNS: &str = "id, title, description, event_type, event_date, \
    start_time, end_time, location, recurrence_type, recurrence_end_date, parent_event_id, \
    created_by, created_at, updated_at";

/// PostgreSQL implementation of EventRepository
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Create a new PgEventRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_event(conn: &mut PgConnection, event: &Event) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO events (id, title, description, event_type, event_date, start_time, end_time,
                            location, recurrence_type, recurrence_end_date, parent_event_id,
                            created_by, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ",
    )
    .bind(event.id.into_uuid())
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.event_type.as_str())
    .bind(event.event_date)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(&event.location)
    .bind(event.recurrence.kind.as_str())
    .bind(event.recurrence.until)
    .bind(event.parent_event_id.map(EventId::into_uuid))
    .bind(event.created_by.into_uuid())
    .bind(event.created_at)
    .bind(event.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let result = sqlx::query_as::<_, EventModel>(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Event::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find(&self, query: &EventQuery) -> RepoResult<Vec<Event>> {
        let sql = format!(
            r"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE ($1::date IS NULL OR event_date >= $1)
              AND ($2::date IS NULL OR event_date <= $2)
              AND ($3::text IS NULL OR event_type = $3)
            ORDER BY event_date, start_time, id
            LIMIT $4
            "
        );
        let rows = sqlx::query_as::<_, EventModel>(&sql)
            .bind(query.from)
            .bind(query.to)
            .bind(query.event_type.map(|t| t.as_str()))
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self))]
    async fn find_children(&self, parent_id: EventId) -> RepoResult<Vec<Event>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE parent_event_id = $1 ORDER BY event_date, id"
        );
        let rows = sqlx::query_as::<_, EventModel>(&sql)
            .bind(parent_id.into_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self, series), fields(parent_id = %series.parent.id, events = series.event_count()))]
    async fn create_series(&self, series: &EventSeries) -> RepoResult<()> {
        // Parent, children and every slot commit together or not at all
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for event in series.events() {
            insert_event(&mut tx, event).await?;
        }
        for slot in &series.slots {
            insert_slot(&mut tx, slot).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        debug!(slots = series.slots.len(), "event series committed");

        Ok(())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &Event) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE events
            SET title = $2, description = $3, event_type = $4, event_date = $5,
                start_time = $6, end_time = $7, location = $8, recurrence_type = $9,
                recurrence_end_date = $10, updated_at = $11
            WHERE id = $1
            ",
        )
        .bind(event.id.into_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_type.as_str())
        .bind(event.event_date)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(&event.location)
        .bind(event.recurrence.kind.as_str())
        .bind(event.recurrence.until)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event.id));
        }

        Ok(())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_events(&self, ids: &[EventId]) -> RepoResult<u64> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Bottom-up: assignments, then slots, then the events themselves.
        // Surviving children of a deleted parent are detached by the FK.
        sqlx::query(
            r"
            DELETE FROM assignments
            WHERE slot_id IN (SELECT id FROM slots WHERE event_id = ANY($1))
            ",
        )
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query("DELETE FROM slots WHERE event_id = ANY($1)")
            .bind(&ids)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM events WHERE id = ANY($1)")
            .bind(&ids)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
