//! Auth session lifecycle: token persistence, JWT payload decode, expiry
//! gating, and small preference flags.

use crate::api::ApiError;
use crate::domain::models::Claims;
use crate::services::storage::config_dir;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoredSession {
    pub token: String,
    pub server: String,
}

fn session_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("session.json"))
}

pub fn load_session() -> anyhow::Result<Option<StoredSession>> {
    let path = session_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn save_session(session: &StoredSession) -> anyhow::Result<()> {
    let path = session_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

/// Returns true when there was a session to remove.
pub fn delete_session() -> anyhow::Result<bool> {
    let path = session_path()?;
    if path.exists() {
        std::fs::remove_file(path)?;
        return Ok(true);
    }
    Ok(false)
}

/// Decode the JWT payload segment without verifying the signature; the
/// client only needs the user id and expiry for gating, the backend is the
/// authority on every call.
pub fn decode_claims(token: &str) -> anyhow::Result<Claims> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => anyhow::bail!("malformed token"),
    };
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| anyhow::anyhow!("malformed token payload"))?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn is_expired(claims: &Claims, now_ts: i64) -> bool {
    claims.exp.map(|exp| exp <= now_ts).unwrap_or(false)
}

/// Load the stored session and gate on expiry; the SPA's redirect-to-login.
pub fn require_session() -> anyhow::Result<StoredSession> {
    let session = load_session()?.ok_or(ApiError::AuthRequired)?;
    let claims = decode_claims(&session.token).map_err(|_| ApiError::AuthRequired)?;
    if is_expired(&claims, chrono::Utc::now().timestamp()) {
        return Err(ApiError::SessionExpired.into());
    }
    Ok(session)
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Prefs {
    #[serde(default)]
    pub kiosk_notice_acknowledged: bool,
}

fn prefs_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("prefs.json"))
}

pub fn load_prefs() -> Prefs {
    let Ok(path) = prefs_path() else {
        return Prefs::default();
    };
    std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save_prefs(prefs: &Prefs) -> anyhow::Result<()> {
    let path = prefs_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(prefs)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: serde_json::Value) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.sig")
    }

    #[test]
    fn decodes_claims_without_verification() {
        let token = token_with_payload(serde_json::json!({
            "sub": 7, "name": "Ana", "rol": "admin", "exp": 4102444800i64
        }));
        let claims = decode_claims(&token).expect("decode");
        assert_eq!(claims.name.as_deref(), Some("Ana"));
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert!(!is_expired(&claims, 1_700_000_000));
    }

    #[test]
    fn expired_token_is_flagged() {
        let token = token_with_payload(serde_json::json!({"sub": 7, "exp": 100}));
        let claims = decode_claims(&token).expect("decode");
        assert!(is_expired(&claims, 101));
    }

    #[test]
    fn token_without_exp_never_expires_client_side() {
        let token = token_with_payload(serde_json::json!({"sub": 7}));
        let claims = decode_claims(&token).expect("decode");
        assert!(!is_expired(&claims, i64::MAX));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(decode_claims("not-a-jwt").is_err());
        assert!(decode_claims("a.b").is_err());
        assert!(decode_claims("a.!!!.c").is_err());
    }
}
