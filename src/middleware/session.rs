//! Session resolution: `token` cookie → signed JWT → user → `Principal`.
//!
//! Handlers never read cookies. The middleware resolves the caller once and
//! stores a typed `Principal` in the request extensions; handlers take it as
//! an extractor argument.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Principal;
use crate::AppState;

/// Claims carried by the session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "_id")]
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Sign a session token for `user_id`.
pub fn issue_token(secret: &str, user_id: Uuid, ttl: Duration) -> anyhow::Result<String> {
    let now = Utc::now();
    let claims = SessionClaims {
        user_id,
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify signature and expiry, returning the user id.
pub fn verify_token(secret: &str, token: &str) -> Option<Uuid> {
    let validation = Validation::new(Algorithm::HS256);
    match decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation) {
        Ok(data) => Some(data.claims.user_id),
        Err(e) => {
            tracing::debug!("session token rejected: {}", e);
            None
        }
    }
}

/// Middleware: resolves the session cookie into a `Principal`.
/// Returns 401 if the cookie is missing, invalid, or names an unknown user.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = match jar.get(&state.config.auth_cookie) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            tracing::warn!("missing session cookie");
            return Err(AppError::Unauthenticated);
        }
    };

    let user_id = verify_token(&state.config.jwt_secret, &token).ok_or(AppError::Unauthenticated)?;

    let user = state
        .store
        .find_user(user_id)
        .await
        .map_err(|e| AppError::internal("Server error while authenticating.", e))?
        .ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "session names an unknown user");
            AppError::Unauthenticated
        })?;

    req.extensions_mut().insert(Principal::from(&user));
    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
