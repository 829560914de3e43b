use chrono::{Duration, Utc};
use huddle_config::IdentitySettings;
use huddle_db::models::Profile;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Identity key error: {0}")]
    KeyConfig(String),
}

/// Claims carried by the identity provider's ID token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // uid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    pub fn profile(&self) -> Profile {
        Profile::new(self.name.clone(), self.email.clone(), self.picture.clone())
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verifies ID tokens issued by the identity provider.
pub struct AuthService {
    settings: IdentitySettings,
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    encoding_key: Option<EncodingKey>,
}

impl AuthService {
    pub fn new(settings: IdentitySettings) -> Result<Self, AuthError> {
        let (algorithm, decoding_key, encoding_key) = match &settings.public_key_pem {
            Some(pem) if !pem.trim().is_empty() => {
                let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::KeyConfig(e.to_string()))?;
                (Algorithm::RS256, key, None)
            }
            _ => (
                Algorithm::HS256,
                DecodingKey::from_secret(settings.token_secret.as_bytes()),
                Some(EncodingKey::from_secret(settings.token_secret.as_bytes())),
            ),
        };

        Ok(Self {
            settings,
            algorithm,
            decoding_key,
            encoding_key,
        })
    }

    pub fn verify_id_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.settings.issuer]);
        if self.settings.project_id.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&[&self.settings.project_id]);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Mints a token with the shared secret. Only available in HS256 mode,
    /// which local development and the test suite use in place of the
    /// provider.
    pub fn issue_token(
        &self,
        uid: &str,
        profile: &Profile,
        ttl_secs: i64,
    ) -> Result<String, AuthError> {
        let key = self.encoding_key.as_ref().ok_or_else(|| {
            AuthError::KeyConfig("tokens can only be issued with a shared secret".to_string())
        })?;

        let now = Utc::now();
        let claims = Claims {
            sub: uid.to_string(),
            email: Some(profile.email.clone()).filter(|e| !e.is_empty()),
            name: Some(profile.name.clone()),
            picture: profile.photo_url.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.project_id.clone(),
        };

        encode(&Header::new(self.algorithm), &claims, key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
