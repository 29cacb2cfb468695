use quill::{models::user::Role, repository::UserRepository};
use reqwest::StatusCode;
use serde_json::json;

use crate::helpers::{ADMIN_ID, AUTHOR_ID, EDITOR_ID, SUBSCRIBER_ID, TestApp};

async fn put_role(app: &TestApp, caller: i64, target: i64, role: &str) -> reqwest::Response {
    app.http_client
        .put(format!("{}/users/{}/role", app.base_url, target))
        .bearer_auth(app.token_for(caller))
        .json(&json!({ "role": role }))
        .send()
        .await
        .expect("Failed to send role assignment")
}

#[tokio::test]
async fn admin_promotes_subscriber() {
    let app = TestApp::new().await;

    let res = put_role(&app, ADMIN_ID, SUBSCRIBER_ID, "author").await;

    assert_eq!(
        res.status(),
        StatusCode::OK,
        "Role assignment failed, response={}",
        res.text().await.expect("Failed to recv res body")
    );
    assert_eq!(
        app.store.user_role(SUBSCRIBER_ID).await.unwrap(),
        Some(Role::Author)
    );
}

#[tokio::test]
async fn admin_may_assign_admin() {
    let app = TestApp::new().await;

    let res = put_role(&app, ADMIN_ID, EDITOR_ID, "admin").await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.expect("Failed to receive response json");
    assert_eq!(body, json!({ "user_id": EDITOR_ID, "role": "admin" }));
}

#[tokio::test]
async fn editor_cannot_change_roles() {
    let app = TestApp::new().await;

    let res = put_role(&app, EDITOR_ID, AUTHOR_ID, "subscriber").await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        app.store.user_role(AUTHOR_ID).await.unwrap(),
        Some(Role::Author),
        "Rejected assignment must not touch the store"
    );
}

#[tokio::test]
async fn demoted_admin_loses_access_immediately() {
    let app = TestApp::new().await;
    let token = app.token_for(ADMIN_ID);

    app.store
        .set_user_role(ADMIN_ID, Role::Subscriber)
        .await
        .unwrap();

    let res = app
        .http_client
        .put(format!("{}/users/{}/role", app.base_url, AUTHOR_ID))
        .bearer_auth(token)
        .json(&json!({ "role": "editor" }))
        .send()
        .await
        .expect("Failed to send role assignment");

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_target_user_is_not_found() {
    let app = TestApp::new().await;

    let res = put_role(&app, ADMIN_ID, 9000, "editor").await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_role_name_is_rejected() {
    let app = TestApp::new().await;

    let res = put_role(&app, ADMIN_ID, AUTHOR_ID, "emperor").await;

    assert!(
        res.status().is_client_error(),
        "Unexpected status {}",
        res.status()
    );
    assert_eq!(
        app.store.user_role(AUTHOR_ID).await.unwrap(),
        Some(Role::Author)
    );
}
