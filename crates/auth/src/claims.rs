use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use landacq_core::SubjectId;

use crate::Role;

/// Claims read from a bearer token's payload.
///
/// These are **unverified**: the client never checks the signature, so the
/// claims are only good for deciding what to show. The backend re-authorizes
/// every request it receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier (`id` claim, falling back to `sub`).
    pub subject: Option<SubjectId>,

    /// Recognised role, if the `role`/`type` claim named one.
    pub role: Option<Role>,

    /// The raw `role`/`type` claim as issued.
    pub raw_role: Option<String>,

    /// Issued-at timestamp, when present.
    pub issued_at: Option<DateTime<Utc>>,

    /// Expiration timestamp (`exp`).
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,
}

impl TokenClaims {
    /// A token is live while `exp` is strictly in the future.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Check the claims' time window against `now`.
///
/// Only expiry is checked; there is no clock-skew allowance and no refresh.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.is_expired(now) {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
