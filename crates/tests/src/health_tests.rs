use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn health_check_is_public() {
    let app = TestApp::spawn_without_db(|_| {}).await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn client_config_exposes_identity_and_links() {
    let app = TestApp::spawn_without_db(|s| {
        s.identity.long_polling = true;
        s.links.meeting_url = "https://meet.example.com/team".to_string();
    })
    .await;

    let resp = app.client.get(app.url("/api/config")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["projectId"], "huddle-test");
    assert_eq!(json["authDomain"], "huddle-test.firebaseapp.com");
    assert_eq!(json["longPolling"], true);
    assert_eq!(json["meetingUrl"], "https://meet.example.com/team");
    assert!(json["driveFolderUrl"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn status_presets_are_listed() {
    let app = TestApp::spawn_without_db(|_| {}).await;

    let resp = app.client.get(app.url("/api/status-preset")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let presets = json.as_array().unwrap();
    assert_eq!(presets.len(), 5);
    assert_eq!(presets[0]["label"], "In a meeting");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::spawn_without_db(|_| {}).await;

    for path in ["/api/member", "/api/chat", "/api/announcement", "/api/dashboard"] {
        let resp = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), 401, "{} should need auth", path);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["error"], "unauthorized");
    }
}

#[tokio::test]
async fn token_from_another_project_is_rejected() {
    let app = TestApp::spawn_without_db(|_| {}).await;
    let other = TestApp::spawn_without_db(|s| {
        s.identity.project_id = "another-project".to_string();
    })
    .await;

    let token = other.token_for("u1", "Mallory");
    let resp = app.auth_get("/api/member", &token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn dashboard_degrades_per_widget_when_store_is_down() {
    let app = TestApp::spawn_without_db(|_| {}).await;
    let token = app.token_for("u1", "Ada");

    let resp = app.auth_get("/api/dashboard", &token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["roster"]["state"], "failed");
    assert_eq!(json["chat"]["state"], "failed");
    assert_eq!(json["announcements"]["state"], "failed");
    assert_eq!(json["statusPresets"].as_array().unwrap().len(), 5);
    assert!(json["meetingUrl"].as_str().is_some());
}

#[tokio::test]
async fn oversized_chat_message_is_rejected_before_the_store() {
    let app = TestApp::spawn_without_db(|_| {}).await;
    let token = app.token_for("u1", "Ada");

    let resp = app
        .auth_post("/api/chat", &token)
        .json(&serde_json::json!({ "message": "x".repeat(501) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    let resp = app
        .auth_post("/api/chat", &token)
        .json(&serde_json::json!({ "message": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}
