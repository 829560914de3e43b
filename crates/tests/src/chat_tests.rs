use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn create_and_list_messages() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;

    for i in 1..=3 {
        let resp = app
            .auth_post("/api/chat", &ada.token)
            .json(&serde_json::json!({ "message": format!("  Hello {}  ", i) }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201, "Failed to create message {}", i);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let resp = app.auth_get("/api/chat", &ada.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);
    // oldest first, trimmed
    assert_eq!(items[0]["message"], "Hello 1");
    assert_eq!(items[2]["message"], "Hello 3");
    assert_eq!(items[0]["name"], "Ada");
    assert_eq!(items[0]["uid"], "ada");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn message_at_limit_is_accepted() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;

    let resp = app
        .auth_post("/api/chat", &ada.token)
        .json(&serde_json::json!({ "message": "x".repeat(500) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post("/api/chat", &ada.token)
        .json(&serde_json::json!({ "message": "x".repeat(501) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    let json: Value = app
        .auth_get("/api/chat", &ada.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
}
