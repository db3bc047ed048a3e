//! Bearer-token payload decoding (no signature verification).
//!
//! A token is `header.payload.signature`; only the payload is read. Any
//! failure collapses to "no claims" through [`peek_claims`], which is what
//! the guard uses.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use landacq_core::SubjectId;

use crate::{Role, TokenClaims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token must have three dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("payload is not valid base64")]
    Base64,

    #[error("payload is not valid JSON: {0}")]
    Json(String),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload has no 'exp' claim")]
    MissingExpiry,

    #[error("'exp' claim is out of range")]
    InvalidExpiry,
}

/// Decode the claims carried by a bearer token.
///
/// Only `exp` is required. Every other claim is read leniently: a claim of
/// an unexpected type is dropped instead of failing the whole token.
pub fn decode_claims(token: &str) -> Result<TokenClaims, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::SegmentCount(segments.len()));
    }

    let bytes = decode_segment(segments[1])?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;
    let Value::Object(payload) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let exp = payload.get("exp").ok_or(DecodeError::MissingExpiry)?;
    let expires_at = exp
        .as_f64()
        .and_then(epoch_seconds)
        .ok_or(DecodeError::InvalidExpiry)?;

    // `role` wins; landowner tokens only carry `type`.
    let raw_role = non_empty_str(&payload, "role").or_else(|| non_empty_str(&payload, "type"));
    let role = raw_role.as_deref().and_then(Role::parse);

    Ok(TokenClaims {
        subject: subject(&payload, "id").or_else(|| subject(&payload, "sub")),
        role,
        raw_role,
        issued_at: payload.get("iat").and_then(Value::as_f64).and_then(epoch_seconds),
        expires_at,
    })
}

fn non_empty_str(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn subject(payload: &Map<String, Value>, key: &str) -> Option<SubjectId> {
    payload
        .get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Infallible form of [`decode_claims`]: failures become `None`.
pub fn peek_claims(token: &str) -> Option<TokenClaims> {
    match decode_claims(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "discarding undecodable token");
            None
        }
    }
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .map_err(|_| DecodeError::Base64)
}

fn epoch_seconds(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    DateTime::from_timestamp(value.floor() as i64, 0)
}
