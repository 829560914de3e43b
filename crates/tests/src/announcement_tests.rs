use crate::fixtures::test_app::TestApp;
use serde_json::Value;
use std::time::Duration;

async fn list(app: &TestApp, token: &str) -> Vec<Value> {
    let resp = app.auth_get("/api/announcement", token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    json.as_array().unwrap().clone()
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn pinning_moves_announcement_ahead_of_newer_ones() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;

    let older = app.post_announcement(&ada, "Offsite next week").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    app.post_announcement(&ada, "New coffee machine").await;

    let items = list(&app, &ada.token).await;
    assert_eq!(items[0]["message"], "New coffee machine");

    let id = older["id"].as_str().unwrap();
    let resp = app
        .auth_put(&format!("/api/announcement/{}/pin", id), &ada.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["pinned"], true);

    let items = list(&app, &ada.token).await;
    assert_eq!(items[0]["message"], "Offsite next week");
    assert_eq!(items[0]["pinned"], true);

    // explicit value wins over toggling
    let resp = app
        .auth_put(&format!("/api/announcement/{}/pin", id), &ada.token)
        .json(&serde_json::json!({ "pinned": true }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["pinned"], true);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn manage_flag_follows_author() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;
    let bob = app.sign_in("bob", "Bob").await;

    app.post_announcement(&ada, "Release is out").await;

    assert_eq!(list(&app, &ada.token).await[0]["canManage"], true);
    let seen_by_bob = list(&app, &bob.token).await;
    assert_eq!(seen_by_bob[0]["canManage"], false);
    assert_eq!(seen_by_bob[0]["authorName"], "Ada");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn delete_announcement() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;

    let created = app.post_announcement(&ada, "Temporary").await;
    let id = created["id"].as_str().unwrap();

    let resp = app
        .auth_delete(&format!("/api/announcement/{}", id), &ada.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);
    assert!(list(&app, &ada.token).await.is_empty());

    let resp = app
        .auth_delete(&format!("/api/announcement/{}", id), &ada.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .auth_delete("/api/announcement/not-an-id", &ada.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}
