//! Bearer-token authentication for moderator endpoints.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lexis_common::{AuthConfig, Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::routes::ApiError;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (moderator ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    pub roles: Vec<String>,
}

/// Authentication state shared across requests.
#[derive(Clone)]
pub struct AuthState {
    jwt_secret: Arc<String>,
    token_expiry_secs: u64,
    moderator_roles: Arc<Vec<String>>,
}

impl AuthState {
    pub fn new(jwt_secret: impl Into<String>, token_expiry_secs: u64, moderator_roles: Vec<String>) -> Self {
        Self {
            jwt_secret: Arc::new(jwt_secret.into()),
            token_expiry_secs,
            moderator_roles: Arc::new(moderator_roles),
        }
    }

    /// Build from configuration.
    ///
    /// Without a configured secret a random one is used, so no externally
    /// issued token will validate and moderator endpoints stay closed.
    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = match &config.jwt_secret {
            Some(secret) => secret.clone(),
            None => {
                tracing::warn!("No JWT secret configured; moderator endpoints will reject every token");
                format!("{}{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4())
            }
        };
        Self::new(secret, config.token_expiry_secs, config.moderator_roles.clone())
    }

    /// Generate a token for a user.
    pub fn generate_token(&self, user_id: &str, roles: Vec<String>) -> Result<String> {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.token_expiry_secs as usize,
            iat: now,
            roles,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("failed to sign token: {e}")))
    }

    /// Validate a token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| Error::Auth(format!("invalid token: {e}")))
    }

    /// Whether any of `roles` may moderate.
    pub fn is_moderator(&self, roles: &[String]) -> bool {
        roles.iter().any(|role| self.moderator_roles.contains(role))
    }
}

/// Caller identity extracted from a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub roles: Vec<String>,
}

/// Require a valid bearer token carrying a moderator role.
///
/// Missing or invalid tokens are rejected with 401, valid tokens without a
/// moderator role with 403.
pub async fn require_moderator(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| Error::Auth("missing bearer token".into()))?;

    let claims = auth.validate_token(token)?;
    if !auth.is_moderator(&claims.roles) {
        tracing::warn!(user_id = %claims.sub, roles = ?claims.roles, "Feedback attempt without moderator role");
        return Err(Error::Forbidden(format!("'{}' is not a moderator", claims.sub)).into());
    }

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        roles: claims.roles,
    });
    Ok(next.run(request).await)
}
