//! API Integration Tests
//!
//! Each test starts its own server over a fresh in-memory store, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create_event(server: &TestServer, request: &CreateEventRequest) -> Value {
    let response = server
        .post_auth("/api/v1/events", &server.admin_token(), request)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn event_detail(server: &TestServer, event_id: &str) -> Value {
    let response = server
        .get_auth(&format!("/api/v1/events/{event_id}"), &server.admin_token())
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap_or_else(|| panic!("missing {key} in {value}"))
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready_on_in_memory_store() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "in_memory");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/public/schedule").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/api/v1/events").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let response = server.get_auth("/api/v1/events", "not-a-jwt").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_deactivated_user_token_stops_working() {
    let server = TestServer::start().await.unwrap();
    let peer_id = server.users.peer.id;

    let response = server
        .patch_auth(
            &format!("/api/v1/users/{peer_id}/active"),
            &server.admin_token(),
            &json!({ "is_active": false }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth("/api/v1/users/me", &server.peer_token())
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "ACCOUNT_INACTIVE");
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_create_weekly_series() {
    let server = TestServer::start().await.unwrap();
    let created = create_event(
        &server,
        &CreateEventRequest::weekly_mass("2030-06-02", "2030-06-23"),
    )
    .await;

    assert_eq!(created["instances_created"], 4);
    assert_eq!(created["slots_created"], 8);
    assert_eq!(created["event"]["recurrence_type"], "weekly");
    assert_eq!(created["event"]["start_time"], "09:30");

    let response = server
        .get_auth(
            "/api/v1/events?startDate=2030-06-01&endDate=2030-06-30",
            &server.peer_token(),
        )
        .await
        .unwrap();
    let events: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    let dates: Vec<&str> = events.iter().map(|e| str_field(e, "event_date")).collect();
    assert_eq!(dates, ["2030-06-02", "2030-06-09", "2030-06-16", "2030-06-23"]);
    assert!(events[1]["parent_event_id"].is_string());
    assert_eq!(events[1]["recurrence_type"], "none");
    assert_eq!(events[1]["slots"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_peer_cannot_create_events() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post_auth(
            "/api/v1/events",
            &server.peer_token(),
            &CreateEventRequest::mass("2030-06-02"),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "MISSING_PERMISSIONS");
}

#[tokio::test]
async fn test_recurring_event_requires_end_date() {
    let server = TestServer::start().await.unwrap();
    let mut request = CreateEventRequest::weekly_mass("2030-06-02", "2030-06-23");
    request.recurrence_end_date = None;

    let response = server
        .post_auth("/api/v1/events", &server.admin_token(), &request)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "MISSING_RECURRENCE_END");
}

#[tokio::test]
async fn test_zero_capacity_fails_validation() {
    let server = TestServer::start().await.unwrap();
    let mut request = CreateEventRequest::mass("2030-06-02");
    request.slots = vec![SlotTemplate::new("Lector", 0)];

    let response = server
        .post_auth("/api/v1/events", &server.admin_token(), &request)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"].is_object());
}

#[tokio::test]
async fn test_malformed_event_id_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .get_auth("/api/v1/events/not-a-uuid", &server.admin_token())
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");
}

#[tokio::test]
async fn test_update_cascades_to_future_occurrences() {
    let server = TestServer::start().await.unwrap();
    let created = create_event(
        &server,
        &CreateEventRequest::weekly_mass("2030-06-02", "2030-06-23"),
    )
    .await;
    let parent_id = str_field(&created["event"], "id").to_string();

    let response = server
        .put_auth(
            &format!("/api/v1/events/{parent_id}"),
            &server.admin_token(),
            &json!({ "title": "Sunday Liturgy", "start_time": "10:00", "apply_to_future": true }),
        )
        .await
        .unwrap();
    let updated: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated["children_updated"], 3);

    let detail = event_detail(&server, &parent_id).await;
    let children = detail["children"].as_array().unwrap();
    assert_eq!(children.len(), 3);

    let child = event_detail(&server, str_field(&children[0], "id")).await;
    assert_eq!(child["title"], "Sunday Liturgy");
    assert_eq!(child["start_time"], "10:00");
    assert_eq!(child["event_date"], "2030-06-09");
}

#[tokio::test]
async fn test_update_without_cascade_leaves_occurrences() {
    let server = TestServer::start().await.unwrap();
    let created = create_event(
        &server,
        &CreateEventRequest::weekly_mass("2030-06-02", "2030-06-16"),
    )
    .await;
    let parent_id = str_field(&created["event"], "id").to_string();

    let response = server
        .put_auth(
            &format!("/api/v1/events/{parent_id}"),
            &server.admin_token(),
            &json!({ "title": "Vigil" }),
        )
        .await
        .unwrap();
    let updated: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated["children_updated"], 0);

    let detail = event_detail(&server, &parent_id).await;
    let child = event_detail(&server, str_field(&detail["children"][0], "id")).await;
    assert_eq!(child["title"], "Sunday Mass");
}

#[tokio::test]
async fn test_delete_series_removes_every_occurrence() {
    let server = TestServer::start().await.unwrap();
    let created = create_event(
        &server,
        &CreateEventRequest::weekly_mass("2030-06-02", "2030-06-23"),
    )
    .await;
    let parent_id = str_field(&created["event"], "id");

    let response = server
        .delete_auth(
            &format!("/api/v1/events/{parent_id}?deleteFutureInstances=true"),
            &server.admin_token(),
        )
        .await
        .unwrap();
    let deleted: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(deleted["events_deleted"], 4);

    let response = server
        .get_auth("/api/v1/events", &server.admin_token())
        .await
        .unwrap();
    let events: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(events.is_empty());
}

// ============================================================================
// Slot Tests
// ============================================================================

#[tokio::test]
async fn test_slot_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let created = create_event(&server, &CreateEventRequest::mass("2030-06-02")).await;
    let event_id = str_field(&created["event"], "id");

    let response = server
        .post_auth(
            "/api/v1/slots",
            &server.admin_token(),
            &json!({ "event_id": event_id, "name": "Usher", "capacity": 3 }),
        )
        .await
        .unwrap();
    let slot: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(slot["open_spots"], 3);
    let slot_id = str_field(&slot, "id");

    let response = server
        .put_auth(
            &format!("/api/v1/slots/{slot_id}"),
            &server.admin_token(),
            &json!({ "capacity": 1 }),
        )
        .await
        .unwrap();
    let slot: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(slot["capacity"], 1);

    let response = server
        .delete_auth(&format!("/api/v1/slots/{slot_id}"), &server.admin_token())
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let detail = event_detail(&server, event_id).await;
    assert_eq!(detail["slots"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Assignment Tests
// ============================================================================

#[tokio::test]
async fn test_assignment_allows_overbooking_but_not_duplicates() {
    let server = TestServer::start().await.unwrap();
    let created = create_event(&server, &CreateEventRequest::mass("2030-06-02")).await;
    let detail = event_detail(&server, str_field(&created["event"], "id")).await;
    let greeter = detail["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Greeter")
        .unwrap();
    let slot_id = str_field(greeter, "id").to_string();

    let response = server
        .post_auth(
            "/api/v1/assignments",
            &server.admin_token(),
            &CreateAssignmentRequest::new(&slot_id, server.users.peer.id),
        )
        .await
        .unwrap();
    let first: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(first["assignment"]["user"]["name"], "Ann");
    assert_eq!(first["assignment"]["event"]["title"], "Sunday Mass");

    // Capacity is 1, so this one overbooks
    let response = server
        .post_auth(
            "/api/v1/assignments",
            &server.admin_token(),
            &CreateAssignmentRequest::new(&slot_id, server.users.admin.id),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/assignments",
            &server.admin_token(),
            &CreateAssignmentRequest::new(&slot_id, server.users.peer.id),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_ASSIGNED");

    let detail = event_detail(&server, str_field(&created["event"], "id")).await;
    let greeter = detail["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "Greeter")
        .unwrap();
    assert_eq!(greeter["assigned_count"], 2);
    assert_eq!(greeter["is_full"], true);
    assert_eq!(greeter["is_overbooked"], true);
    assert_eq!(greeter["open_spots"], 0);
}

#[tokio::test]
async fn test_same_start_time_returns_double_booking_warning() {
    let server = TestServer::start().await.unwrap();
    let morning = create_event(&server, &CreateEventRequest::mass("2030-06-02")).await;
    // Same date and start time as the Mass
    let mut clash = CreateEventRequest::mass("2030-06-02");
    clash.title = "Children's Liturgy".to_string();
    clash.location = Some("Parish Hall".to_string());
    let liturgy = create_event(&server, &clash).await;

    let peer = server.users.peer.id;
    for created in [&morning, &liturgy] {
        let detail = event_detail(&server, str_field(&created["event"], "id")).await;
        let slot_id = str_field(&detail["slots"][0], "id").to_string();
        let response = server
            .post_auth(
                "/api/v1/assignments",
                &server.admin_token(),
                &CreateAssignmentRequest::new(&slot_id, peer),
            )
            .await
            .unwrap();
        let result: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
        let warnings = result["warnings"].as_array().unwrap();
        if created == &liturgy {
            assert_eq!(warnings.len(), 1);
        } else {
            assert!(warnings.is_empty());
        }
    }
}

#[tokio::test]
async fn test_peer_only_sees_own_assignments() {
    let server = TestServer::start().await.unwrap();
    let created = create_event(&server, &CreateEventRequest::mass("2030-06-02")).await;
    let detail = event_detail(&server, str_field(&created["event"], "id")).await;
    let slot_id = str_field(&detail["slots"][0], "id").to_string();

    for user_id in [server.users.peer.id, server.users.admin.id] {
        let response = server
            .post_auth(
                "/api/v1/assignments",
                &server.admin_token(),
                &CreateAssignmentRequest::new(&slot_id, user_id),
            )
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server
        .get_auth(
            &format!("/api/v1/assignments?userId={}", server.users.admin.id),
            &server.peer_token(),
        )
        .await
        .unwrap();
    let mine: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["user"]["id"], server.users.peer.id.to_string());

    let response = server
        .get_auth("/api/v1/assignments", &server.admin_token())
        .await
        .unwrap();
    let all: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_unassign() {
    let server = TestServer::start().await.unwrap();
    let created = create_event(&server, &CreateEventRequest::mass("2030-06-02")).await;
    let detail = event_detail(&server, str_field(&created["event"], "id")).await;
    let slot_id = str_field(&detail["slots"][0], "id").to_string();

    let response = server
        .post_auth(
            "/api/v1/assignments",
            &server.admin_token(),
            &CreateAssignmentRequest::new(&slot_id, server.users.peer.id),
        )
        .await
        .unwrap();
    let result: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let assignment_id = str_field(&result["assignment"], "id");

    let path = format!("/api/v1/assignments/{assignment_id}");
    let response = server.delete_auth(&path, &server.admin_token()).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.delete_auth(&path, &server.admin_token()).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Reminder Tests
// ============================================================================

async fn assign_peer_to_mass(server: &TestServer, date: &str) -> String {
    let created = create_event(server, &CreateEventRequest::mass(date)).await;
    let detail = event_detail(server, str_field(&created["event"], "id")).await;
    let slot_id = str_field(&detail["slots"][0], "id").to_string();
    let response = server
        .post_auth(
            "/api/v1/assignments",
            &server.admin_token(),
            &CreateAssignmentRequest::new(&slot_id, server.users.peer.id),
        )
        .await
        .unwrap();
    let result: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    str_field(&result["assignment"], "id").to_string()
}

#[tokio::test]
async fn test_sweep_sends_each_reminder_once() {
    let server = TestServer::start().await.unwrap();
    assign_peer_to_mass(&server, "2030-06-02").await;

    let response = server
        .post_empty("/api/v1/reminders/sweep?date=2030-06-01", None)
        .await
        .unwrap();
    let report: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(report["sent"], 1);
    assert_eq!(report["by_offset"]["1"]["sent"], 1);

    let messages = server.sms.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "+15550001002");
    assert!(messages[0].1.starts_with("Hi Ann! Reminder:"));
    assert!(messages[0].1.contains("Sunday Mass"));

    let response = server
        .post_empty("/api/v1/reminders/sweep?date=2030-06-01", None)
        .await
        .unwrap();
    let report: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(report["sent"], 0);
    assert_eq!(server.sms.messages().len(), 1);
}

#[tokio::test]
async fn test_sweep_rejects_bad_date() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post_empty("/api/v1/reminders/sweep?date=June", None)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_QUERY_PARAMETER");

    let response = server
        .post_empty("/api/v1/reminders/sweep?date=2030-6-1", None)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_sweep_requires_cron_secret_when_configured() {
    let server = TestServer::start_with_cron_secret("s3cret").await.unwrap();
    let path = "/api/v1/reminders/sweep?date=2030-06-01";

    let response = server.post_empty(path, None).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.post_empty(path, Some("wrong")).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.post_empty(path, Some("s3cret")).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_manual_reminder_and_log() {
    let server = TestServer::start().await.unwrap();
    let assignment_id = assign_peer_to_mass(&server, "2030-06-02").await;

    let response = server
        .post_auth(
            "/api/v1/reminders/send",
            &server.admin_token(),
            &json!({ "assignment_id": assignment_id, "custom_message": "See you Sunday" }),
        )
        .await
        .unwrap();
    let sent: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(sent["message"], "See you Sunday");
    assert_eq!(sent["provider_id"], "SMtest1");

    let response = server
        .get_auth("/api/v1/reminders/log?limit=10", &server.admin_token())
        .await
        .unwrap();
    let log: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["status"], "sent");
    assert_eq!(log[0]["phone"], "+15550001002");

    let response = server
        .get_auth("/api/v1/reminders/log", &server.peer_token())
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_create_user_normalizes_phone_and_rejects_duplicates() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post_auth(
            "/api/v1/users",
            &server.admin_token(),
            &CreateUserRequest::peer("Joseph", "(555) 123-4567"),
        )
        .await
        .unwrap();
    let user: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(user["phone"], "+15551234567");
    assert_eq!(user["role"], "peer_minister");

    let response = server
        .post_auth(
            "/api/v1/users",
            &server.admin_token(),
            &CreateUserRequest::peer("Joe", "555.123.4567"),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "PHONE_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_list_users_requires_staff() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get_auth("/api/v1/users?search=ann", &server.admin_token())
        .await
        .unwrap();
    let users: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Ann");

    let response = server
        .get_auth("/api/v1/users", &server.peer_token())
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_me_and_self_update() {
    let server = TestServer::start().await.unwrap();
    let peer_id = server.users.peer.id;

    let response = server
        .patch_auth(
            &format!("/api/v1/users/{peer_id}"),
            &server.peer_token(),
            &json!({ "notifications_enabled": false }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth("/api/v1/users/me", &server.peer_token())
        .await
        .unwrap();
    let me: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me["name"], "Ann");
    assert_eq!(me["notifications_enabled"], false);
}

#[tokio::test]
async fn test_last_super_admin_is_protected() {
    let server = TestServer::start().await.unwrap();
    let id = server.users.super_admin.id;

    let response = server
        .patch_auth(
            &format!("/api/v1/users/{id}/role"),
            &server.super_admin_token(),
            &json!({ "role": "admin" }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "LAST_SUPER_ADMIN");

    let response = server
        .patch_auth(
            &format!("/api/v1/users/{id}/role"),
            &server.admin_token(),
            &json!({ "role": "peer_minister" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Public Schedule Tests
// ============================================================================

#[tokio::test]
async fn test_public_schedule_shows_names_only() {
    let server = TestServer::start().await.unwrap();
    assign_peer_to_mass(&server, "2099-06-07").await;

    let response = server.get("/api/v1/public/schedule").await.unwrap();
    let schedule: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(schedule.len(), 1);
    let staffed = schedule[0]["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["assigned_count"] == 1)
        .unwrap();
    let assignee = &staffed["assignees"][0];
    assert_eq!(assignee["name"], "Ann");
    assert!(assignee.get("phone").is_none());
}
