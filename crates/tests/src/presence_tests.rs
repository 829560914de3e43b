use futures::SinkExt;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use crate::fixtures::seed::eventually;
use crate::fixtures::test_app::TestApp;
use crate::ws_tests::{next_of_type, open_session};

async fn status_is(app: &TestApp, token: &str, expected: &str) -> bool {
    let json: Value = app
        .auth_get("/api/member/me", token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    json["status"] == expected
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn sign_in_meeting_focus_round_trip() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada Lovelace").await;

    let me = app.me(&ada).await;
    assert_eq!(me["status"], "Online");
    assert_eq!(me["name"], "Ada Lovelace");
    assert_eq!(me["isCurrentUser"], true);

    let mut socket = open_session(&app, &ada.token, "tab-1").await;

    let resp = app
        .auth_post("/api/member/me/meeting", &ada.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["meetingUrl"], app.settings.links.meeting_url.as_str());
    assert!(eventually(|| status_is(&app, &ada.token, "In Call")).await);

    socket
        .send(Message::text(r#"{"type":"presence:focus"}"#))
        .await
        .unwrap();
    assert!(eventually(|| status_is(&app, &ada.token, "Online")).await);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn custom_status_keeps_presence() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;

    app.auth_post("/api/member/me/meeting", &ada.token)
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_put("/api/member/me/custom-status", &ada.token)
        .json(&serde_json::json!({ "customStatus": "Focus time" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let me = app.me(&ada).await;
    assert_eq!(me["status"], "In Call");
    assert_eq!(me["name"], "Ada");
    assert_eq!(me["customStatus"], "Focus time");

    // empty clears it
    app.auth_put("/api/member/me/custom-status", &ada.token)
        .json(&serde_json::json!({ "customStatus": "" }))
        .send()
        .await
        .unwrap();
    let me = app.me(&ada).await;
    assert!(me.get("customStatus").is_none());
    assert_eq!(me["status"], "In Call");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn roster_lists_viewer_first_then_by_status() {
    let app = TestApp::spawn().await;
    let a = app.sign_in("a", "A").await;
    let b = app.sign_in("b", "B").await;
    let c = app.sign_in("c", "C").await;

    app.auth_post("/api/auth/logout", &a.token).send().await.unwrap();
    app.auth_put("/api/member/me/status", &b.token)
        .json(&serde_json::json!({ "status": "In Call" }))
        .send()
        .await
        .unwrap();

    let json: Value = app
        .auth_get("/api/member", &c.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["uid"].as_str().unwrap())
        .collect();
    assert_eq!(order, ["c", "b", "a"]);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn logout_marks_offline_before_responding() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;
    let _socket = open_session(&app, &ada.token, "tab-1").await;

    let resp = app
        .auth_post("/api/auth/logout", &ada.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);
    assert_eq!(app.me(&ada).await["status"], "Offline");
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn closing_the_socket_marks_offline() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;

    let mut socket = open_session(&app, &ada.token, "tab-1").await;
    assert!(eventually(|| status_is(&app, &ada.token, "Online")).await);

    socket.close(None).await.unwrap();
    assert!(eventually(|| status_is(&app, &ada.token, "Offline")).await);
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn roster_snapshot_is_pushed_on_change() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada", "Ada").await;
    let mut socket = open_session(&app, &ada.token, "tab-1").await;
    next_of_type(&mut socket, "roster:snapshot").await;

    app.sign_in("bob", "Bob").await;

    let mut seen_bob = false;
    for _ in 0..10 {
        let snapshot = next_of_type(&mut socket, "roster:snapshot").await;
        let members = snapshot["data"].as_array().unwrap();
        if members.iter().any(|m| m["uid"] == "bob") {
            // viewer is listed first
            assert_eq!(members[0]["uid"], "ada");
            seen_bob = true;
            break;
        }
    }
    assert!(seen_bob);
}
