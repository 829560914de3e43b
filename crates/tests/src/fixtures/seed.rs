use serde_json::Value;
use std::future::Future;
use std::time::Duration;

use super::test_app::TestApp;

/// A user signed in through `/api/auth/session`.
pub struct SeededUser {
    pub uid: String,
    pub name: String,
    pub token: String,
}

impl TestApp {
    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    /// Sign a user in and return their auth info.
    pub async fn sign_in(&self, uid: &str, name: &str) -> SeededUser {
        let token = self.token_for(uid, name);
        let resp = self
            .auth_post("/api/auth/session", &token)
            .send()
            .await
            .expect("Sign-in request failed");

        assert_eq!(resp.status().as_u16(), 200, "Sign-in failed for {}", uid);

        SeededUser {
            uid: uid.to_string(),
            name: name.to_string(),
            token,
        }
    }

    pub async fn me(&self, user: &SeededUser) -> Value {
        self.auth_get("/api/member/me", &user.token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    pub async fn post_announcement(&self, user: &SeededUser, message: &str) -> Value {
        let resp = self
            .auth_post("/api/announcement", &user.token)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201);
        resp.json().await.unwrap()
    }
}

/// Polls `check` until it returns true or two seconds pass. Presence writes
/// from live sessions land asynchronously.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..40 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
