use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Shared team meeting room opened by "Join Team Meeting".
pub const DEFAULT_MEETING_URL: &str = "https://meet.google.com/ers-kcmp-bnf";
/// Shared Drive folder whose contents are listed on the dashboard.
pub const DEFAULT_DRIVE_FOLDER_ID: &str = "0ANhzl3TC5lTjUk9PVA";
pub const DEFAULT_DRIVE_FOLDER_URL: &str =
    "https://drive.google.com/drive/u/0/folders/0ANhzl3TC5lTjUk9PVA";
/// Placeholder HS256 secret. Anyone can sign tokens with it.
pub const DEFAULT_TOKEN_SECRET: &str = "change-me-in-production";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
    pub drive: DriveSettings,
    pub links: LinkSettings,
    pub presence: PresenceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Identity provider the ID tokens come from.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    pub api_key: String,
    pub project_id: String,
    pub app_id: String,
    /// HS256 secret, used when `public_key_pem` is not set.
    pub token_secret: String,
    /// RS256 public key of the provider.
    pub public_key_pem: Option<String>,
    pub issuer: String,
    /// Transport compatibility mode handed to clients (long-polling instead
    /// of streaming connections).
    pub long_polling: bool,
}

impl IdentitySettings {
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.project_id.is_empty() && !self.app_id.is_empty()
    }

    pub fn auth_domain(&self) -> String {
        format!("{}.firebaseapp.com", self.project_id)
    }

    /// Why ID tokens could be forged under this config, if they could.
    pub fn verification_weakness(&self) -> Option<&'static str> {
        let has_public_key = self
            .public_key_pem
            .as_deref()
            .is_some_and(|pem| !pem.trim().is_empty());
        if !has_public_key
            && (self.token_secret.is_empty() || self.token_secret == DEFAULT_TOKEN_SECRET)
        {
            return Some("no public key is configured and the token secret is the built-in default");
        }
        if self.project_id.is_empty() {
            return Some("project_id is empty, so the token audience is not checked");
        }
        None
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DriveSettings {
    pub api_base_url: String,
    pub folder_id: String,
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LinkSettings {
    pub meeting_url: String,
    pub drive_folder_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PresenceSettings {
    pub offline_grace_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("HUDDLE"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "huddle")?
            .set_default("identity.api_key", "")?
            .set_default("identity.project_id", "")?
            .set_default("identity.app_id", "")?
            .set_default("identity.token_secret", DEFAULT_TOKEN_SECRET)?
            .set_default("identity.issuer", "huddle")?
            .set_default("identity.long_polling", false)?
            .set_default("drive.api_base_url", "https://www.googleapis.com/drive/v3")?
            .set_default("drive.folder_id", DEFAULT_DRIVE_FOLDER_ID)?
            .set_default("drive.page_size", 10)?
            .set_default("links.meeting_url", DEFAULT_MEETING_URL)?
            .set_default("links.drive_folder_url", DEFAULT_DRIVE_FOLDER_URL)?
            .set_default("presence.offline_grace_secs", 30)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
