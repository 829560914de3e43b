use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use huddle_db::models::Profile;
use huddle_services::auth::{AuthError, Claims, bearer_token};

use crate::{error::ApiError, state::AppState};

/// The signed-in user, taken from the `Authorization: Bearer` ID token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub profile: Profile,
    #[allow(dead_code)]
    pub claims: Claims,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header).ok_or(AuthError::MissingToken)?;

        let claims = state.auth.verify_id_token(token)?;

        Ok(AuthUser {
            uid: claims.sub.clone(),
            profile: claims.profile(),
            claims,
        })
    }
}
