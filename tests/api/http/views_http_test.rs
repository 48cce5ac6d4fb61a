//! Derived view HTTP Handler Tests

use super::{build_test_router, get_json, TestAppState};
use crate::api::{create_test_class, create_test_entry};
use portal_core::api::SuccessResponse;
use portal_core::domain::{PendingVolunteer, Role, VolunteerDashboardRow};
use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_pending_volunteers_lists_viewers_for_admin() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let (viewer, _) = state.add_user(Role::Viewer).await;
    state.add_user(Role::Volunteer).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<PendingVolunteer>>>) =
        get_json(&app, "/api/v1/views/pending-volunteers", Some(&admin_token)).await;

    assert_eq!(status, StatusCode::OK);
    let pending = body.unwrap().data;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, viewer.id);
    assert_eq!(pending[0].email, viewer.email);
}

#[tokio::test]
async fn test_pending_volunteers_forbidden_for_non_admin() {
    let state = TestAppState::new();
    let (_, viewer_token) = state.add_user(Role::Viewer).await;
    let (_, volunteer_token) = state.add_user(Role::Volunteer).await;
    let app = build_test_router(state);

    for token in [&viewer_token, &volunteer_token] {
        let (status, _): (StatusCode, Option<Value>) =
            get_json(&app, "/api/v1/views/pending-volunteers", Some(token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/views/pending-volunteers", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dashboard_admin_sees_teaching_rows_only() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let (volunteer, _) = state.add_user(Role::Volunteer).await;
    let (demoted, _) = state.add_user(Role::Viewer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_class(class.clone()).await;
    let entry = create_test_entry(class.id, volunteer.id);
    state.syllabus_repo.add_entry(entry.clone()).await;
    state
        .syllabus_repo
        .add_entry(create_test_entry(class.id, demoted.id))
        .await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<VolunteerDashboardRow>>>) =
        get_json(&app, "/api/v1/views/volunteer-dashboard", Some(&admin_token)).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.unwrap().data;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entry_id, entry.id);
    assert_eq!(rows[0].volunteer_email, volunteer.email);
    assert_eq!(rows[0].class_label, "10A Maths");
}

#[tokio::test]
async fn test_dashboard_volunteer_sees_own_rows_in_assigned_classes() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let (colleague, _) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    let other = create_test_class("10B Maths");
    state.class_repo.add_class(class.clone()).await;
    state.class_repo.add_class(other.clone()).await;
    state.class_repo.add_assignment(volunteer.id, class.id).await;
    state.class_repo.add_assignment(colleague.id, class.id).await;
    let own = create_test_entry(class.id, volunteer.id);
    state.syllabus_repo.add_entry(own.clone()).await;
    // Colleague's row: the caller cannot read the colleague's user row.
    state
        .syllabus_repo
        .add_entry(create_test_entry(class.id, colleague.id))
        .await;
    // Own row in a class the caller is not assigned to.
    state
        .syllabus_repo
        .add_entry(create_test_entry(other.id, volunteer.id))
        .await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<VolunteerDashboardRow>>>) =
        get_json(&app, "/api/v1/views/volunteer-dashboard", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.unwrap().data;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].entry_id, own.id);
}

#[tokio::test]
async fn test_dashboard_anonymous_is_empty() {
    let state = TestAppState::new();
    let (volunteer, _) = state.add_user(Role::Volunteer).await;
    let class = create_test_class("10A Maths");
    state.class_repo.add_class(class.clone()).await;
    state
        .syllabus_repo
        .add_entry(create_test_entry(class.id, volunteer.id))
        .await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<Vec<VolunteerDashboardRow>>>) =
        get_json(&app, "/api/v1/views/volunteer-dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap().data.is_empty());
}
