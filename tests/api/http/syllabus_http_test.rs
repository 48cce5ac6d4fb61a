//! Syllabus entry API HTTP Handler Tests

use super::{build_test_router, delete_json, get_json, post_json, put_json, TestAppState};
use crate::api::{create_test_class, create_test_entry};
use portal_core::api::SuccessResponse;
use portal_core::domain::{Role, SyllabusEntry};
use axum::http::StatusCode;
use serde_json::{json, Value};

fn entry_body(class_id: impl std::fmt::Display, volunteer_id: impl std::fmt::Display) -> Value {
    json!({
        "class_id": class_id.to_string(),
        "volunteer_id": volunteer_id.to_string(),
        "date_taught": "2026-09-14",
        "duration_minutes": 50,
        "topics": ["Quadratic equations"],
        "notes": "Worked through factorising",
        "test_metadata": { "title": "Quiz 1", "max_score": 20 }
    })
}

#[tokio::test]
async fn test_unassigned_viewer_sees_empty_list() {
    let state = TestAppState::new();
    let (_, token) = state.add_user(Role::Viewer).await;
    let (volunteer, _) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_class(class.clone()).await;
    state
        .syllabus_repo
        .add_entry(create_test_entry(class.id, volunteer.id))
        .await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<SyllabusEntry>>>) =
        get_json(&app, "/api/v1/syllabus-entries", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap().data.is_empty());
}

#[tokio::test]
async fn test_assigned_viewer_sees_class_entries() {
    let state = TestAppState::new();
    let (viewer, token) = state.add_user(Role::Viewer).await;
    let (volunteer, _) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    let other = create_test_class("10B Maths");
    state.class_repo.add_class(class.clone()).await;
    state.class_repo.add_class(other.clone()).await;
    state.class_repo.add_assignment(viewer.id, class.id).await;
    state
        .syllabus_repo
        .add_entry(create_test_entry(class.id, volunteer.id))
        .await;
    state
        .syllabus_repo
        .add_entry(create_test_entry(other.id, volunteer.id))
        .await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<SyllabusEntry>>>) =
        get_json(&app, "/api/v1/syllabus-entries", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.unwrap().data;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].class_id, class.id);
}

#[tokio::test]
async fn test_list_filtered_by_class() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let (volunteer, _) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    let other = create_test_class("10B Maths");
    state
        .syllabus_repo
        .add_entry(create_test_entry(class.id, volunteer.id))
        .await;
    state
        .syllabus_repo
        .add_entry(create_test_entry(other.id, volunteer.id))
        .await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<SyllabusEntry>>>) = get_json(
        &app,
        &format!("/api/v1/syllabus-entries?class_id={}", other.id),
        Some(&admin_token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.unwrap().data;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].class_id, other.id);
}

#[tokio::test]
async fn test_volunteer_logs_own_session_unapproved() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_class(class.clone()).await;
    state.class_repo.add_assignment(volunteer.id, class.id).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<SyllabusEntry>>) = post_json(
        &app,
        "/api/v1/syllabus-entries",
        Some(&token),
        &entry_body(class.id, volunteer.id),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let entry = body.unwrap().data;
    assert_eq!(entry.volunteer_id, volunteer.id);
    assert!(!entry.approved);
    assert_eq!(entry.test_metadata.unwrap().title, "Quiz 1");
}

#[tokio::test]
async fn test_volunteer_cannot_log_for_another_volunteer() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let (colleague, _) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_class(class.clone()).await;
    state.class_repo.add_assignment(volunteer.id, class.id).await;
    state.class_repo.add_assignment(colleague.id, class.id).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/syllabus-entries",
        Some(&token),
        &entry_body(class.id, colleague.id),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_volunteer_cannot_log_for_unassigned_class() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_class(class.clone()).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/v1/syllabus-entries",
        Some(&token),
        &entry_body(class.id, volunteer.id),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_rejects_zero_duration() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_assignment(volunteer.id, class.id).await;
    let app = build_test_router(state);

    let mut body = entry_body(class.id, volunteer.id);
    body["duration_minutes"] = json!(0);
    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/v1/syllabus-entries", Some(&token), &body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_volunteer_update_cannot_self_approve() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_assignment(volunteer.id, class.id).await;
    let entry = create_test_entry(class.id, volunteer.id);
    state.syllabus_repo.add_entry(entry.clone()).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<SyllabusEntry>>) = put_json(
        &app,
        &format!("/api/v1/syllabus-entries/{}", entry.id),
        Some(&token),
        &json!({ "notes": "Added homework", "approved": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated = body.unwrap().data;
    assert_eq!(updated.notes.as_deref(), Some("Added homework"));
    assert!(!updated.approved);
}

#[tokio::test]
async fn test_admin_approves_entry() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let (volunteer, _) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    let entry = create_test_entry(class.id, volunteer.id);
    state.syllabus_repo.add_entry(entry.clone()).await;
    let syllabus_repo = state.syllabus_repo.clone();
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/syllabus-entries/{}", entry.id),
        Some(&admin_token),
        &json!({ "approved": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(syllabus_repo.get(entry.id).await.unwrap().approved);
}

#[tokio::test]
async fn test_volunteer_cannot_update_colleague_entry() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let (colleague, _) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_assignment(volunteer.id, class.id).await;
    let entry = create_test_entry(class.id, colleague.id);
    state.syllabus_repo.add_entry(entry.clone()).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/syllabus-entries/{}", entry.id),
        Some(&token),
        &json!({ "notes": "Overwritten" }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_admin_deletes_entries() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_assignment(volunteer.id, class.id).await;
    let entry = create_test_entry(class.id, volunteer.id);
    state.syllabus_repo.add_entry(entry.clone()).await;
    let syllabus_repo = state.syllabus_repo.clone();
    let app = build_test_router(state);
    let path = format!("/api/v1/syllabus-entries/{}", entry.id);

    let (status, _): (StatusCode, Option<Value>) = delete_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(syllabus_repo.get(entry.id).await.is_some());

    let (status, _): (StatusCode, Option<Value>) = delete_json(&app, &path, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(syllabus_repo.get(entry.id).await.is_none());
}
