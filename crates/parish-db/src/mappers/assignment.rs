//! Assignment model -> entity mappers

use parish_core::{
    Assignment, AssignmentDetails, AssignmentId, DomainError, RemindersSent, SlotId, UserId,
};

use crate::models::{AssignmentDetailsModel, AssignmentModel, EventModel, SlotModel, UserModel};

impl From<AssignmentModel> for Assignment {
    fn from(model: AssignmentModel) -> Self {
        Assignment {
            id: AssignmentId::from_uuid(model.id),
            slot_id: SlotId::from_uuid(model.slot_id),
            user_id: UserId::from_uuid(model.user_id),
            notes: model.notes,
            created_by: UserId::from_uuid(model.created_by),
            reminders_sent: RemindersSent::from_raw(model.reminders_sent),
            created_at: model.created_at,
        }
    }
}

impl TryFrom<AssignmentDetailsModel> for AssignmentDetails {
    type Error = DomainError;

    fn try_from(m: AssignmentDetailsModel) -> Result<Self, Self::Error> {
        let assignment = Assignment::from(AssignmentModel {
            id: m.a_id,
            slot_id: m.s_id,
            user_id: m.u_id,
            notes: m.a_notes,
            created_by: m.a_created_by,
            reminders_sent: m.a_reminders_sent,
            created_at: m.a_created_at,
        });
        let slot = SlotModel {
            id: m.s_id,
            event_id: m.e_id,
            name: m.s_name,
            capacity: m.s_capacity,
            notes: m.s_notes,
            created_at: m.s_created_at,
        }
        .try_into()?;
        let event = EventModel {
            id: m.e_id,
            title: m.e_title,
            description: m.e_description,
            event_type: m.e_event_type,
            event_date: m.e_event_date,
            start_time: m.e_start_time,
            end_time: m.e_end_time,
            location: m.e_location,
            recurrence_type: m.e_recurrence_type,
            recurrence_end_date: m.e_recurrence_end_date,
            parent_event_id: m.e_parent_event_id,
            created_by: m.e_created_by,
            created_at: m.e_created_at,
            updated_at: m.e_updated_at,
        }
        .try_into()?;
        let user = UserModel {
            id: m.u_id,
            name: m.u_name,
            phone: m.u_phone,
            email: m.u_email,
            role: m.u_role,
            is_active: m.u_is_active,
            notifications_enabled: m.u_notifications_enabled,
            created_at: m.u_created_at,
            updated_at: m.u_updated_at,
        }
        .try_into()?;

        Ok(AssignmentDetails {
            assignment,
            slot,
            event,
            user,
        })
    }
}
