use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};
use crate::state::AppState;

const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn is_privileged(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn decode_claims(token: &str, secret: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AppError::Unauthorized
        })
}

/// Guards write routes: a valid HS256 token whose role is `admin`.
/// The decoded claims are left in the request extensions for handlers.
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    let claims = decode_claims(token, &state.config.jwt_secret)?;

    if !claims.is_privileged() {
        tracing::warn!(sub = %claims.sub, role = %claims.role, "🚫 Non-admin attempted a write");
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
pub(crate) fn token_for(role: &str, secret: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: format!("{role}-user"),
        role: role.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}
