mod common;

use common::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_follow_and_unfollow() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in_user("nicola").await;
    let (followee_id, _) = app.signed_in_user("jane").await;
    let path = format!("/api/users/{}/follow", followee_id);

    let response = app
        .post_authenticated(&path, &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.db.count("followers").await, 1);

    let duplicate = app
        .post_authenticated(&path, &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    for _ in 0..2 {
        let response = app
            .delete_authenticated(&path, &token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    assert_eq!(app.db.count("followers").await, 0);
}

#[tokio::test]
async fn test_follow_unknown_user() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in_user("nicola").await;

    let response = app
        .post_authenticated(&format!("/api/users/{}/follow", uuid::Uuid::new_v4()), &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_follow_self() {
    let app = TestApp::spawn().await;
    let (user_id, token) = app.signed_in_user("nicola").await;

    let response = app
        .post_authenticated(&format!("/api/users/{}/follow", user_id), &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in_user("nicola").await;

    let response = app
        .get_authenticated(&format!("/api/users/{}", uuid::Uuid::new_v4()), &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivate_requires_moderator() {
    let app = TestApp::spawn().await;
    let (_, token) = app.signed_in_user("nicola").await;
    let (target_id, _) = app.signed_in_user("jane").await;
    let path = format!("/api/users/{}/deactivate", target_id);

    let response = app
        .patch_authenticated(&path, &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_deactivates_user() {
    let app = TestApp::spawn().await;
    let (admin_id, _) = app.signed_in_user("boss").await;
    app.set_role(&admin_id, "admin").await;
    let admin_token = app.login("boss@feed.test", "pass_word!").await;
    let (target_id, _) = app.signed_in_user("jane").await;
    sqlx::query("UPDATE users SET is_active = TRUE")
        .execute(&app.db.pool)
        .await
        .expect("Failed to activate users");

    let response = app
        .patch_authenticated(&format!("/api/users/{}/deactivate", target_id), &admin_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["id"], target_id);
    assert_eq!(body["data"]["is_active"], false);
}
