//! Signed session tokens.
//!
//! A token is `base64url(claims_json) "." sha256_hex(payload "." secret)`.
//! The signature binds the claims to the server secret, so a client can
//! read its own claims but cannot alter them.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::model::Member;

/// Sessions last one day
pub const TOKEN_TTL_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Member id
    pub sub: String,
    pub group_id: String,
    pub name: String,
    pub is_admin: bool,
    /// Expiry, unix epoch milliseconds
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_member(member: &Member, now_ms: i64) -> Self {
        Self {
            sub: member.id.clone(),
            group_id: member.group_id.clone(),
            name: member.name.clone(),
            is_admin: member.is_admin,
            exp: now_ms + TOKEN_TTL_MS,
        }
    }
}

pub fn issue(claims: &SessionClaims, secret: &str) -> Result<String> {
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
    let signature = sign(&payload, secret);
    Ok(format!("{}.{}", payload, signature))
}

pub fn verify(token: &str, secret: &str, now_ms: i64) -> Result<SessionClaims> {
    let (payload, signature) = token
        .trim()
        .split_once('.')
        .ok_or_else(|| Error::Unauthorized("malformed token".to_string()))?;

    if !constant_time_eq(sign(payload, secret).as_bytes(), signature.as_bytes()) {
        return Err(Error::Unauthorized("bad token signature".to_string()));
    }

    let raw = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| Error::Unauthorized("malformed token".to_string()))?;
    let claims: SessionClaims =
        serde_json::from_slice(&raw).map_err(|_| Error::Unauthorized("malformed token".to_string()))?;

    if now_ms > claims.exp {
        return Err(Error::Unauthorized("session expired".to_string()));
    }

    Ok(claims)
}

fn sign(payload: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(b".");
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
