//! JWT authentication module.
//!
//! Token issuing at login and the authorization gate in front of every
//! protected operation.
//!
//! ## Gate Decisions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Authorization header                                                   │
//! │       │                                                                 │
//! │       ├── absent / not "Bearer <token>"       → Unauthenticated         │
//! │       ├── bad signature / algorithm / expired → Unauthenticated         │
//! │       ├── no role claim                       → Unauthenticated         │
//! │       ├── unknown role                        → Forbidden               │
//! │       ├── role not allowed for operation      → Forbidden               │
//! │       └── otherwise                           → Principal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use bookvault_core::{Operation, Role};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Role '{role}' is not allowed to {operation}")]
    Forbidden { role: String, operation: Operation },

    #[error("Failed to issue token: {0}")]
    TokenIssue(String),
}

// =============================================================================
// Clock
// =============================================================================

/// Source of token issue times.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// =============================================================================
// Claims
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub username: String,

    /// Absent in tokens that were not issued by login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// The authenticated caller of a protected operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

// =============================================================================
// JWT Manager
// =============================================================================

/// Signs and verifies HS256 tokens.
///
/// Expiry is checked against the system time by `jsonwebtoken` (60s leeway);
/// the injected clock only decides `iat`/`exp` at issue time.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
    clock: Arc<dyn Clock>,
}

impl JwtManager {
    pub fn new(secret: &str, lifetime_secs: i64, clock: Arc<dyn Clock>) -> Self {
        JwtManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
            clock,
        }
    }

    /// Issue a token for a verified user.
    pub fn issue(&self, user_id: i64, username: &str, role: Role) -> Result<String, AuthError> {
        let now = self.clock.now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: Some(role.as_str().to_string()),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Validate signature, algorithm and expiry, then decode the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Unauthenticated(format!("Invalid token: {}", e)))
    }
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Authorization Gate
// =============================================================================

/// Stateless check in front of every protected operation.
#[derive(Debug, Clone)]
pub struct AuthGate {
    jwt: Arc<JwtManager>,
}

impl AuthGate {
    pub fn new(jwt: Arc<JwtManager>) -> Self {
        AuthGate { jwt }
    }

    /// Resolve the caller from an `Authorization` header value and check
    /// that their role may invoke `operation`.
    pub fn authorize(
        &self,
        auth_header: Option<&str>,
        operation: Operation,
    ) -> Result<Principal, AuthError> {
        let header = auth_header
            .ok_or_else(|| reject(operation, "missing authorization header".to_string()))?;

        let token = extract_bearer_token(header)
            .ok_or_else(|| reject(operation, "expected 'Bearer <token>'".to_string()))?;

        let claims = self.jwt.verify(token).map_err(|e| {
            warn!(%operation, error = %e, "Token rejected");
            e
        })?;

        let raw_role = claims
            .role
            .ok_or_else(|| reject(operation, "token carries no role".to_string()))?;

        let role: Role = raw_role.parse().map_err(|_| {
            warn!(%operation, role = %raw_role, "Unknown role claim");
            AuthError::Forbidden {
                role: raw_role.clone(),
                operation,
            }
        })?;

        if !role.can(operation) {
            warn!(%operation, %role, user = %claims.sub, "Role not allowed");
            return Err(AuthError::Forbidden {
                role: role.to_string(),
                operation,
            });
        }

        let user_id = claims
            .sub
            .parse()
            .map_err(|_| reject(operation, "subject is not a user id".to_string()))?;

        debug!(%operation, user_id, %role, "Authorized");

        Ok(Principal {
            user_id,
            username: claims.username,
            role,
        })
    }
}

fn reject(operation: Operation, reason: String) -> AuthError {
    warn!(%operation, reason = %reason, "Unauthenticated request");
    AuthError::Unauthenticated(reason)
}
