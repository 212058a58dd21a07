//! PostgreSQL implementation of AssignmentRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use parish_core::traits::{AssignmentQuery, AssignmentRepository, RepoResult};
use parish_core::{
    Assignment, AssignmentDetails, AssignmentId, DomainError, Event, EventId, ReminderOffset,
    SlotId, UserId,
};

use crate::models::{AssignmentDetailsModel, AssignmentModel, EventModel};

use super::error::{convert_all, map_db_error, map_unique_violation};

const ASSIGNMENT_COLUMNS: &str =
    "id, slot_id, user_id, notes, created_by, reminders_sent, created_at";

/// Joined select shared by every query returning `AssignmentDetails`
const DETAILS_SELECT: &str = r"
    SELECT a.id AS a_id, a.notes AS a_notes, a.created_by AS a_created_by,
           a.reminders_sent AS a_reminders_sent, a.created_at AS a_created_at,
           s.id AS s_id, s.name AS s_name, s.capacity AS s_capacity, s.notes AS s_notes,
           s.created_at AS s_created_at,
           e.id AS e_id, e.title AS e_title, e.description AS e_description,
           e.event_type AS e_event_type, e.event_date AS e_event_date,
           e.start_time AS e_start_time, e.end_time AS e_end_time, e.location AS e_location,
           e.recurrence_type AS e_recurrence_type,
           e.recurrence_end_date AS e_recurrence_end_date,
           e.parent_event_id AS e_parent_event_id, e.created_by AS e_created_by,
           e.created_at AS e_created_at, e.updated_at AS e_updated_at,
           u.id AS u_id, u.name AS u_name, u.phone AS u_phone, u.email AS u_email,
           u.role AS u_role, u.is_active AS u_is_active,
           u.notifications_enabled AS u_notifications_enabled,
           u.created_at AS u_created_at, u.updated_at AS u_updated_at
    FROM assignments a
    JOIN slots s ON s.id = a.slot_id
    JOIN events e ON e.id = s.event_id
    JOIN users u ON u.id = a.user_id
";

/// PostgreSQL implementation of AssignmentRepository
#[derive(Clone)]
pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    /// Create a new PgAssignmentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepository for PgAssignmentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        let sql = format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1");
        let result = sqlx::query_as::<_, AssignmentModel>(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Assignment::from))
    }

    #[instrument(skip(self, slot_ids), fields(count = slot_ids.len()))]
    async fn find_by_slots(&self, slot_ids: &[SlotId]) -> RepoResult<Vec<Assignment>> {
        let ids: Vec<Uuid> = slot_ids.iter().map(|id| id.into_uuid()).collect();
        let sql = format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE slot_id = ANY($1) ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, AssignmentModel>(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_details(&self, id: AssignmentId) -> RepoResult<Option<AssignmentDetails>> {
        let sql = format!("{DETAILS_SELECT} WHERE a.id = $1");
        let result = sqlx::query_as::<_, AssignmentDetailsModel>(&sql)
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(AssignmentDetails::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_details_by_query(
        &self,
        query: &AssignmentQuery,
    ) -> RepoResult<Vec<AssignmentDetails>> {
        let sql = format!(
            r"
            {DETAILS_SELECT}
            WHERE ($1::uuid IS NULL OR a.user_id = $1)
              AND ($2::uuid IS NULL OR e.id = $2)
              AND ($3::date IS NULL OR e.event_date >= $3)
              AND ($4::date IS NULL OR e.event_date <= $4)
            ORDER BY e.event_date, e.start_time, s.name, u.name
            "
        );
        let rows = sqlx::query_as::<_, AssignmentDetailsModel>(&sql)
            .bind(query.user_id.map(UserId::into_uuid))
            .bind(query.event_id.map(EventId::into_uuid))
            .bind(query.from)
            .bind(query.to)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self))]
    async fn find_user_events_on(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> RepoResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventModel>(
            r"
            SELECT DISTINCT e.id, e.title, e.description, e.event_type, e.event_date,
                   e.start_time, e.end_time, e.location, e.recurrence_type,
                   e.recurrence_end_date, e.parent_event_id, e.created_by,
                   e.created_at, e.updated_at
            FROM events e
            JOIN slots s ON s.event_id = e.id
            JOIN assignments a ON a.slot_id = s.id
            WHERE a.user_id = $1 AND e.event_date = $2
            ",
        )
        .bind(user_id.into_uuid())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self))]
    async fn find_due(
        &self,
        date: NaiveDate,
        offset: ReminderOffset,
    ) -> RepoResult<Vec<AssignmentDetails>> {
        let sql = format!(
            r"
            {DETAILS_SELECT}
            WHERE e.event_date = $1 AND NOT ($2 = ANY(a.reminders_sent))
            ORDER BY e.start_time, a.id
            "
        );
        let rows = sqlx::query_as::<_, AssignmentDetailsModel>(&sql)
            .bind(date)
            .bind(offset.raw())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self, assignment), fields(assignment_id = %assignment.id))]
    async fn create(&self, assignment: &Assignment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO assignments (id, slot_id, user_id, notes, created_by, reminders_sent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(assignment.id.into_uuid())
        .bind(assignment.slot_id.into_uuid())
        .bind(assignment.user_id.into_uuid())
        .bind(&assignment.notes)
        .bind(assignment.created_by.into_uuid())
        .bind(assignment.reminders_sent.to_raw())
        .bind(assignment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| DomainError::AlreadyAssigned))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: AssignmentId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AssignmentNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_reminder_sent(
        &self,
        id: AssignmentId,
        offset: ReminderOffset,
    ) -> RepoResult<bool> {
        // Conditional append keeps concurrent sweeps from recording an offset twice
        let result = sqlx::query(
            r"
            UPDATE assignments
            SET reminders_sent = array_append(reminders_sent, $2)
            WHERE id = $1 AND NOT ($2 = ANY(reminders_sent))
            ",
        )
        .bind(id.into_uuid())
        .bind(offset.raw())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM assignments WHERE id = $1)",
        )
        .bind(id.into_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        if exists {
            Ok(false)
        } else {
            Err(DomainError::AssignmentNotFound(id))
        }
    }

    #[instrument(skip(self))]
    async fn clear_reminder_sent(
        &self,
        id: AssignmentId,
        offset: ReminderOffset,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE assignments SET reminders_sent = array_remove(reminders_sent, $2) WHERE id = $1",
        )
        .bind(id.into_uuid())
        .bind(offset.raw())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AssignmentNotFound(id));
        }

        Ok(())
    }
}
