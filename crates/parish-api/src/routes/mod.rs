//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{assignments, events, health, public, reminders, slots, users};
use crate::state::AppState;

/// Create the main API router (health is mounted separately to bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(event_routes())
        .merge(slot_routes())
        .merge(assignment_routes())
        .merge(reminder_routes())
        .merge(user_routes())
        .merge(public_routes())
}

/// Event and series routes
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:event_id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
}

/// Slot routes
fn slot_routes() -> Router<AppState> {
    Router::new()
        .route("/slots", post(slots::create_slot))
        .route(
            "/slots/:slot_id",
            put(slots::update_slot).delete(slots::delete_slot),
        )
}

/// Assignment routes
fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/assignments",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route(
            "/assignments/:assignment_id",
            delete(assignments::delete_assignment),
        )
}

/// Reminder routes
fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route("/reminders/send", post(reminders::send_reminder))
        .route("/reminders/sweep", post(reminders::run_sweep))
        .route("/reminders/log", get(reminders::sms_log))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/me", get(users::get_current_user))
        .route("/users/:user_id", patch(users::update_user))
        .route("/users/:user_id/role", patch(users::change_role))
        .route("/users/:user_id/active", patch(users::set_active))
}

/// Unauthenticated routes
fn public_routes() -> Router<AppState> {
    Router::new().route("/public/schedule", get(public::upcoming_schedule))
}
