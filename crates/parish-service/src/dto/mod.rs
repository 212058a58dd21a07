//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    ChangeRoleRequest, CreateAssignmentRequest, CreateEventRequest, CreateSlotRequest,
    CreateUserRequest, DeleteEventQuery, ListAssignmentsQuery, ListEventsQuery, ListUsersQuery,
    PublicScheduleQuery, SendReminderRequest, SetActiveRequest, SlotTemplateRequest, SmsLogQuery,
    SweepQuery, UpdateEventRequest, UpdateSlotRequest, UpdateUserRequest,
};

// Re-export commonly used response types
pub use responses::{
    AssignmentEventSummary, AssignmentResponse, AssignmentResult, AssignmentSlotSummary,
    ChildEventResponse, EventDeleteResponse, EventDetailResponse, EventListItem, EventResponse,
    EventSeriesResponse, EventUpdateResponse, HealthChecks, HealthResponse, ManualReminderResponse,
    OffsetReport, PublicAssigneeResponse, PublicEventResponse, PublicSlotResponse,
    ReadinessResponse, SlotAssigneeResponse, SlotDetailResponse, SlotResponse, SmsLogResponse,
    SweepReport, UserResponse, UserSummary,
};
