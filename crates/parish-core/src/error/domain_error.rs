//! Domain errors - error types for the domain layer

use chrono::NaiveDate;
use thiserror::Error;

use crate::value_objects::{AssignmentId, EventId, SlotId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Assignment not found: {0}")]
    AssignmentNotFound(AssignmentId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Slot capacity must be between 1 and {max}, got {0}", max = i32::MAX)]
    InvalidCapacity(i64),

    #[error("Recurrence end date is required for recurring events")]
    MissingRecurrenceEnd,

    #[error("Recurrence end date {end} is before start date {start}")]
    RecurrenceEndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("Recurrence runs past the supported calendar range")]
    RecurrenceOutOfRange,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing capability: {0}")]
    MissingCapability(String),

    #[error("Account is deactivated")]
    AccountInactive,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User is already assigned to this slot")]
    AlreadyAssigned,

    #[error("Phone number already in use")]
    PhoneAlreadyExists,

    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Cannot demote or deactivate the last active super admin")]
    LastSuperAdmin,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::EventNotFound(_) => "UNKNOWN_EVENT",
            Self::SlotNotFound(_) => "UNKNOWN_SLOT",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::AssignmentNotFound(_) => "UNKNOWN_ASSIGNMENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidPhone(_) => "INVALID_PHONE",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::InvalidTime(_) => "INVALID_TIME",
            Self::InvalidCapacity(_) => "INVALID_CAPACITY",
            Self::MissingRecurrenceEnd => "MISSING_RECURRENCE_END",
            Self::RecurrenceEndBeforeStart { .. } => "RECURRENCE_END_BEFORE_START",
            Self::RecurrenceOutOfRange => "RECURRENCE_OUT_OF_RANGE",

            // Authorization
            Self::MissingCapability(_) => "MISSING_PERMISSIONS",
            Self::AccountInactive => "ACCOUNT_INACTIVE",

            // Conflict
            Self::AlreadyAssigned => "ALREADY_ASSIGNED",
            Self::PhoneAlreadyExists => "PHONE_ALREADY_EXISTS",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::LastSuperAdmin => "LAST_SUPER_ADMIN",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound(_)
                | Self::SlotNotFound(_)
                | Self::UserNotFound(_)
                | Self::AssignmentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidPhone(_)
                | Self::InvalidDate(_)
                | Self::InvalidTime(_)
                | Self::InvalidCapacity(_)
                | Self::MissingRecurrenceEnd
                | Self::RecurrenceEndBeforeStart { .. }
                | Self::RecurrenceOutOfRange
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::MissingCapability(_) | Self::AccountInactive)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyAssigned
                | Self::PhoneAlreadyExists
                | Self::EmailAlreadyExists
                | Self::LastSuperAdmin
        )
    }
}
