use huddle_api::{build_router, state::AppState};
use huddle_config::Settings;
use huddle_db::{connect_lazy, indexes::ensure_indexes};
use huddle_db::models::Profile;
use huddle_services::AuthService;
use mongodb::Database;
use std::net::SocketAddr;
use tokio::net::TcpListener;

const TEST_PROJECT_ID: &str = "huddle-test";
const TEST_TOKEN_SECRET: &str = "test-secret-key-for-id-tokens-minimum-32-chars";

/// A running test application.
pub struct TestApp {
    pub addr: SocketAddr,
    pub base_url: String,
    pub db: Database,
    pub settings: Settings,
    pub client: reqwest::Client,
    auth: AuthService,
    owns_db: bool,
}

impl TestApp {
    /// Spawn a new test server with its own MongoDB database.
    ///
    /// Requires a running MongoDB at localhost:27017.
    /// Set HUDDLE__DATABASE__URL env var to override the connection string.
    /// Each test gets a unique database name for isolation.
    pub async fn spawn() -> Self {
        Self::spawn_with_settings(|_| {}).await
    }

    /// Spawn a test server with customized settings, backed by MongoDB.
    pub async fn spawn_with_settings(mutator: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = test_settings();
        settings.database.name = format!("huddle_test_{}", uuid::Uuid::new_v4().simple());
        mutator(&mut settings);

        let db = connect_lazy(&settings)
            .await
            .expect("Failed to parse MongoDB URL");
        ensure_indexes(&db).await.expect("Failed to create indexes");

        Self::start(db, settings, true).await
    }

    /// Spawn a test server whose database is unreachable. Enough for routes
    /// that never touch the store; store queries fail fast.
    pub async fn spawn_without_db(mutator: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = test_settings();
        settings.database.url =
            "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200"
                .to_string();
        mutator(&mut settings);

        let db = connect_lazy(&settings)
            .await
            .expect("Failed to parse MongoDB URL");

        Self::start(db, settings, false).await
    }

    async fn start(db: Database, settings: Settings, owns_db: bool) -> Self {
        let app_state =
            AppState::new(db.clone(), settings.clone()).expect("Failed to create AppState");
        let app = build_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let auth = AuthService::new(settings.identity.clone()).expect("Failed to build AuthService");

        Self {
            addr,
            base_url: format!("http://{}", addr),
            db,
            settings,
            client: reqwest::Client::new(),
            auth,
            owns_db,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn ws_url(&self, token: &str, session: &str) -> String {
        format!("ws://{}/ws?token={}&session={}", self.addr, token, session)
    }

    /// Mints an ID token the server accepts, as the identity provider would.
    pub fn token_for(&self, uid: &str, name: &str) -> String {
        let profile = Profile::new(
            Some(name.to_string()),
            Some(format!("{}@example.com", uid)),
            None,
        );
        self.auth
            .issue_token(uid, &profile, 3600)
            .expect("Failed to issue test token")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if !self.owns_db {
            return;
        }
        let db = self.db.clone();
        // Best effort cleanup: drop the test database
        tokio::spawn(async move {
            let _ = db.drop().await;
        });
    }
}

fn test_settings() -> Settings {
    let mut settings = Settings::load().expect("Failed to load settings");
    if let Ok(url) = std::env::var("HUDDLE__DATABASE__URL") {
        settings.database.url = url;
    }
    settings.app.host = "127.0.0.1".to_string();
    settings.app.port = 0;
    settings.identity.project_id = TEST_PROJECT_ID.to_string();
    settings.identity.api_key = "test-api-key".to_string();
    settings.identity.app_id = "test-app-id".to_string();
    settings.identity.token_secret = TEST_TOKEN_SECRET.to_string();
    settings.identity.public_key_pem = None;
    settings
}
