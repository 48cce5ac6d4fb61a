//! User API HTTP Handler Tests

use super::{build_test_router, delete_json, get_json, post_json, put_json, token_for, TestAppState};
use crate::api::create_test_user;
use portal_core::api::{MessageResponse, PaginatedResponse, SuccessResponse};
use portal_core::domain::{Role, User};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

// ============================================================================
// Me
// ============================================================================

#[tokio::test]
async fn test_me_returns_own_row() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) =
        get_json(&app, "/api/v1/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let user = body.unwrap().data;
    assert_eq!(user.id, volunteer.id);
    assert_eq!(user.role, Role::Volunteer);
}

#[tokio::test]
async fn test_me_anonymous_is_unauthorized() {
    let app = build_test_router(TestAppState::new());

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, "/api/v1/me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_unprovisioned_identity_not_found() {
    let state = TestAppState::new();
    let stranger = create_test_user(Role::Viewer);
    let token = token_for(&stranger);
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, "/api/v1/me", Some(&token)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = build_test_router(TestAppState::new());

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/v1/classes", Some("not-a-jwt")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "Invalid or expired token");
}

// ============================================================================
// List / Get
// ============================================================================

#[tokio::test]
async fn test_list_users_admin_sees_everyone() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    state.add_user(Role::Volunteer).await;
    state.add_user(Role::Viewer).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<PaginatedResponse<User>>) =
        get_json(&app, "/api/v1/users", Some(&admin_token)).await;

    assert_eq!(status, StatusCode::OK);
    let response = body.unwrap();
    assert_eq!(response.data.len(), 3);
    assert_eq!(response.pagination.total, 3);
}

#[tokio::test]
async fn test_list_users_pagination() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    for _ in 0..24 {
        state.add_user(Role::Viewer).await;
    }
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<PaginatedResponse<User>>) =
        get_json(&app, "/api/v1/users?page=2&per_page=10", Some(&admin_token)).await;

    assert_eq!(status, StatusCode::OK);
    let response = body.unwrap();
    assert_eq!(response.data.len(), 10);
    assert_eq!(response.pagination.total, 25);
    assert_eq!(response.pagination.page, 2);
}

#[tokio::test]
async fn test_list_users_huge_page_is_empty() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let app = build_test_router(state);

    for path in [
        "/api/v1/users?page=9223372036854775807",
        "/api/v1/users?page=9223372036854775807&per_page=100",
    ] {
        let (status, body): (StatusCode, Option<PaginatedResponse<User>>) =
            get_json(&app, path, Some(&admin_token)).await;

        assert_eq!(status, StatusCode::OK);
        let response = body.unwrap();
        assert!(response.data.is_empty());
        assert_eq!(response.pagination.total, 1);
    }
}

#[tokio::test]
async fn test_list_users_non_admin_sees_only_self() {
    let state = TestAppState::new();
    state.add_user(Role::Admin).await;
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    state.add_user(Role::Viewer).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<PaginatedResponse<User>>) =
        get_json(&app, "/api/v1/users", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let response = body.unwrap();
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].id, volunteer.id);
}

#[tokio::test]
async fn test_list_users_anonymous_is_empty() {
    let state = TestAppState::new();
    state.add_user(Role::Admin).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<PaginatedResponse<User>>) =
        get_json(&app, "/api/v1/users", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap().data.is_empty());
}

#[tokio::test]
async fn test_get_other_user_forbidden_for_volunteer() {
    let state = TestAppState::new();
    let (_, token) = state.add_user(Role::Volunteer).await;
    let (other, _) = state.add_user(Role::Volunteer).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/api/v1/users/{}", other.id), Some(&token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.unwrap()["message"], "Not permitted");
}

#[tokio::test]
async fn test_get_missing_user_hidden_from_non_admin() {
    let state = TestAppState::new();
    let (_, token) = state.add_user(Role::Volunteer).await;
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let app = build_test_router(state);
    let missing = format!("/api/v1/users/{}", uuid::Uuid::new_v4());

    let (status, _): (StatusCode, Option<Value>) = get_json(&app, &missing, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, &missing, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_self_with_role_escalation_changes_name_only() {
    let state = TestAppState::new();
    let (viewer, token) = state.add_user(Role::Viewer).await;
    let user_repo = state.user_repo.clone();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) = put_json(
        &app,
        &format!("/api/v1/users/{}", viewer.id),
        Some(&token),
        &json!({ "display_name": "Renamed", "role": "admin" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let user = body.unwrap().data;
    assert_eq!(user.display_name.as_deref(), Some("Renamed"));
    assert_eq!(user.role, Role::Viewer);

    let stored = user_repo.get(viewer.id).await.unwrap();
    assert_eq!(stored.role, Role::Viewer);
}

#[tokio::test]
async fn test_update_self_sets_avatar_url() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) = put_json(
        &app,
        &format!("/api/v1/users/{}", volunteer.id),
        Some(&token),
        &json!({ "avatar_url": "https://storage.portal.test/avatars/me.png" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.unwrap().data.avatar_url.as_deref(),
        Some("https://storage.portal.test/avatars/me.png")
    );
}

#[tokio::test]
async fn test_update_rejects_malformed_avatar_url() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/users/{}", volunteer.id),
        Some(&token),
        &json!({ "avatar_url": "not a url" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_unknown_role_value_rejected_without_write() {
    let state = TestAppState::new();
    let (viewer, token) = state.add_user(Role::Viewer).await;
    let user_repo = state.user_repo.clone();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/v1/users/{}", viewer.id),
        Some(&token),
        &json!({ "display_name": "Renamed", "role": "superadmin" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "invalid_role");
    assert_eq!(user_repo.get(viewer.id).await.unwrap(), viewer);
}

#[tokio::test]
async fn test_update_other_user_forbidden() {
    let state = TestAppState::new();
    let (_, token) = state.add_user(Role::Volunteer).await;
    let (other, _) = state.add_user(Role::Viewer).await;
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let app = build_test_router(state);
    let path = format!("/api/v1/users/{}", other.id);

    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, &path, Some(&token), &json!({ "display_name": "Hijacked" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Profile rows belong to their owner, admins included.
    let (status, _): (StatusCode, Option<Value>) =
        put_json(&app, &path, Some(&admin_token), &json!({ "display_name": "Hijacked" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_updating_self_may_change_role() {
    let state = TestAppState::new();
    let (admin, token) = state.add_user(Role::Admin).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) = put_json(
        &app,
        &format!("/api/v1/users/{}", admin.id),
        Some(&token),
        &json!({ "role": "volunteer" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.role, Role::Volunteer);
}

// ============================================================================
// Promote
// ============================================================================

#[tokio::test]
async fn test_promote_viewer_to_volunteer() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let (viewer, _) = state.add_user(Role::Viewer).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) = post_json(
        &app,
        &format!("/api/v1/users/{}/role", viewer.id),
        Some(&admin_token),
        &json!({ "role": "volunteer" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.role, Role::Volunteer);
}

#[tokio::test]
async fn test_promote_invalid_role_leaves_user_unchanged() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let (viewer, _) = state.add_user(Role::Viewer).await;
    let user_repo = state.user_repo.clone();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/api/v1/users/{}/role", viewer.id),
        Some(&admin_token),
        &json!({ "role": "superadmin" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.unwrap()["error"], "invalid_role");
    assert_eq!(user_repo.get(viewer.id).await.unwrap().role, Role::Viewer);
}

#[tokio::test]
async fn test_promote_requires_admin() {
    let state = TestAppState::new();
    let (volunteer, token) = state.add_user(Role::Volunteer).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/api/v1/users/{}/role", volunteer.id),
        Some(&token),
        &json!({ "role": "admin" }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_promote_missing_user_not_found_for_admin() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        &format!("/api/v1/users/{}/role", uuid::Uuid::new_v4()),
        Some(&admin_token),
        &json!({ "role": "volunteer" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_user_admin_only() {
    let state = TestAppState::new();
    let (_, admin_token) = state.add_user(Role::Admin).await;
    let (viewer, viewer_token) = state.add_user(Role::Viewer).await;
    let user_repo = state.user_repo.clone();
    let app = build_test_router(state);
    let path = format!("/api/v1/users/{}", viewer.id);

    let (status, _): (StatusCode, Option<Value>) = delete_json(&app, &path, Some(&viewer_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(user_repo.get(viewer.id).await.is_some());

    let (status, body): (StatusCode, Option<MessageResponse>) =
        delete_json(&app, &path, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.unwrap().message.contains("deleted"));
    assert!(user_repo.get(viewer.id).await.is_none());
}
