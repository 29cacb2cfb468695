use reqwest::StatusCode;
use serde_json::json;

use crate::helpers::{ADMIN_ID, EDITOR_ID, SUBSCRIBER_ID, TestApp};

#[tokio::test]
async fn list_roles_in_privilege_order() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/roles", None).await;

    assert_eq!(status, StatusCode::OK);
    let roles: Vec<&str> = body
        .as_array()
        .expect("Response body is not an array")
        .iter()
        .map(|entry| entry["role"].as_str().expect("Role entry without name"))
        .collect();
    assert_eq!(
        roles,
        vec!["subscriber", "contributor", "author", "editor", "admin"]
    );
    assert_eq!(body[0]["permissions"], json!(["READ_CONTENT"]));
}

#[tokio::test]
async fn role_permissions_exclude_manage_roles_for_editor() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/roles/editor/permissions", None).await;

    assert_eq!(status, StatusCode::OK);
    let permissions = body.as_array().expect("Response body is not an array");
    assert!(permissions.contains(&json!("MODERATE_COMMENTS")));
    assert!(!permissions.contains(&json!("MANAGE_ROLES")));
}

#[tokio::test]
async fn unknown_role_has_no_permissions() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/roles/overlord/permissions", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn my_permissions_requires_token() {
    let app = TestApp::new().await;

    let (status, _) = app.get_json("/me/permissions", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get_json("/me/permissions", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_missing_user_is_rejected() {
    let app = TestApp::new().await;
    let token = app.token_for(4242);

    let (status, _) = app.get_json("/me/permissions", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn my_permissions_reflect_role() {
    let app = TestApp::new().await;

    let token = app.token_for(SUBSCRIBER_ID);
    let (status, body) = app.get_json("/me/permissions", Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "response={body}");
    assert_eq!(body["user_id"], SUBSCRIBER_ID);
    assert_eq!(body["role"], "subscriber");
    assert_eq!(body["permissions"], json!(["READ_CONTENT"]));
    assert_eq!(body["assignable_roles"], json!([]));

    let token = app.token_for(ADMIN_ID);
    let (_, body) = app.get_json("/me/permissions", Some(&token)).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(
        body["assignable_roles"],
        json!(["subscriber", "contributor", "author", "editor", "admin"])
    );
}

async fn check(app: &TestApp, user_id: i64, payload: serde_json::Value) -> serde_json::Value {
    let res = app
        .http_client
        .post(format!("{}/me/permissions/check", app.base_url))
        .bearer_auth(app.token_for(user_id))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send permission check");

    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.expect("Failed to receive response json")
}

#[tokio::test]
async fn check_all_and_any() {
    let app = TestApp::new().await;

    let body = check(
        &app,
        EDITOR_ID,
        json!({ "permissions": ["publish_posts", "manage_pages"] }),
    )
    .await;
    assert_eq!(body["granted"], true);

    let body = check(
        &app,
        EDITOR_ID,
        json!({ "permissions": ["publish_posts", "manage_roles"], "mode": "all" }),
    )
    .await;
    assert_eq!(body["granted"], false);

    let body = check(
        &app,
        EDITOR_ID,
        json!({ "permissions": ["publish_posts", "manage_roles"], "mode": "any" }),
    )
    .await;
    assert_eq!(body["granted"], true);
}

#[tokio::test]
async fn check_with_empty_list_keeps_any_all_asymmetry() {
    let app = TestApp::new().await;

    let body = check(&app, SUBSCRIBER_ID, json!({ "permissions": [], "mode": "all" })).await;
    assert_eq!(body["granted"], true);

    let body = check(&app, SUBSCRIBER_ID, json!({ "permissions": [], "mode": "any" })).await;
    assert_eq!(body["granted"], false);
}

#[tokio::test]
async fn check_reports_unknown_permission_names() {
    let app = TestApp::new().await;

    let body = check(
        &app,
        ADMIN_ID,
        json!({ "permissions": ["read_content", "time_travel"], "mode": "all" }),
    )
    .await;
    assert_eq!(body["granted"], false);
    assert_eq!(body["unknown"], json!(["time_travel"]));

    let body = check(
        &app,
        ADMIN_ID,
        json!({ "permissions": ["read_content", "time_travel"], "mode": "any" }),
    )
    .await;
    assert_eq!(body["granted"], true);
}

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::new().await;

    let res = app
        .http_client
        .get(format!("{}/health_check", app.base_url))
        .send()
        .await
        .expect("Failed to send health check");

    assert_eq!(res.status(), StatusCode::OK);
}
