use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use studio_common::{Role, UserRecord};

/// Signed-in dashboard user extracted from a session token.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header format")]
    InvalidFormat,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Session token claims.
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    sub: String,
    email: String,
    role: Role,
    exp: i64,
    iat: i64,
}

/// Longest session a token may grant (one year).
pub const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Issues and validates HS256 session tokens.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes.clamp(1, MAX_TTL_MINUTES)),
        }
    }

    /// Sign a token for a user who just logged in.
    pub fn issue(&self, user: &UserRecord) -> Result<String, SessionError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| SessionError::Signing("session expiry out of range".to_string()))?;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    /// Authenticate a request by validating the Bearer token.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<SessionUser, SessionError> {
        let auth_header = headers
            .get("authorization")
            .ok_or(SessionError::MissingHeader)?
            .to_str()
            .map_err(|_| SessionError::InvalidFormat)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(SessionError::InvalidFormat)?;

        self.validate(token)
    }

    pub fn validate(&self, token: &str) -> Result<SessionUser, SessionError> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))?;

        Ok(SessionUser {
            id: token_data.claims.sub,
            email: token_data.claims.email,
            role: token_data.claims.role,
        })
    }
}
