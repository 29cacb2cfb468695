use reqwest::StatusCode;

use crate::helpers::{
    POST_A_ID, POST_B_ID, POST_C_ID, SOURCE_POST_ID, TestApp, UNTAGGED_POST_ID,
};

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body.as_array()
        .expect("Response body is not an array")
        .iter()
        .map(|item| item["id"].as_i64().expect("Related item without id"))
        .collect()
}

#[tokio::test]
async fn related_posts_ranked_by_shared_taxonomy() {
    let app = TestApp::new().await;

    let (status, body) = app
        .get_json(&format!("/posts/{SOURCE_POST_ID}/related"), None)
        .await;

    assert_eq!(status, StatusCode::OK, "response={body}");
    assert_eq!(ids(&body), vec![POST_A_ID, POST_B_ID]);
    assert_eq!(body[0]["score"], 4);
    assert_eq!(body[1]["score"], 3);
    assert_eq!(body[0]["slug"], "post-a");
    assert!(!ids(&body).contains(&POST_C_ID));
}

#[tokio::test]
async fn limit_query_truncates_results() {
    let app = TestApp::new().await;

    let (status, body) = app
        .get_json(&format!("/posts/{SOURCE_POST_ID}/related?limit=1"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![POST_A_ID]);
}

#[tokio::test]
async fn untagged_post_gets_most_recent_posts() {
    let app = TestApp::new().await;

    let (status, body) = app
        .get_json(&format!("/posts/{UNTAGGED_POST_ID}/related?limit=2"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![POST_C_ID, POST_B_ID]);
    assert_eq!(body[0]["score"], 0);
}

#[tokio::test]
async fn unknown_post_has_no_related_posts() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/posts/999999/related", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());
}

#[tokio::test]
async fn store_failure_degrades_to_empty_list() {
    let app = TestApp::new().await;
    app.store.fail_with("database went away").await;

    let (status, body) = app
        .get_json(&format!("/posts/{SOURCE_POST_ID}/related"), None)
        .await;

    assert_eq!(
        status,
        StatusCode::OK,
        "Related posts should not fail the page, response={body}"
    );
    assert!(ids(&body).is_empty());
}
