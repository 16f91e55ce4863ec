use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::net::SocketAddr;

/// Hash a key with SHA-256 for constant-time-safe HashMap lookup.
/// By storing and comparing hashes (fixed 64-char hex) instead of raw keys,
/// the HashMap lookup timing does not leak information about the key value.
fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod auth_tests;

/// User id fallback when no API keys are configured (development mode).
const DEV_USER_ID: &str = "dev";

/// API key authentication middleware with brute-force protection.
///
/// Checks for API key in:
/// 1. X-API-Key header (recommended)
/// 2. Authorization: Bearer <token> header
///
/// Each configured key maps to a user identity; every downstream query is
/// scoped to that user. If API_KEYS is not set, all requests run as a fixed
/// development user.
pub async fn auth_middleware(
    State(state): State<crate::AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let valid_keys = get_valid_api_keys();

    // Health check stays open
    let path = request.uri().path();
    if path == "/" || path == "/health" {
        return Ok(next.run(request).await);
    }

    // Development mode: no keys configured, act as the dev user
    if valid_keys.is_empty() {
        request.extensions_mut().insert(AuthedUser {
            user_id: DEV_USER_ID.to_string(),
        });
        return Ok(next.run(request).await);
    }

    let ip = connect_info
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // Check brute-force lockout before attempting validation
    if state.brute_force_guard.is_locked(&ip) {
        return Err(AuthError::Locked);
    }

    let api_key = extract_api_key(&headers)?;

    let key_hash = hash_key(&api_key);
    let user_id = match valid_keys.get(&key_hash) {
        Some(user_id) => {
            state.brute_force_guard.record_success(&ip);
            user_id.clone()
        }
        None => {
            tracing::warn!("Invalid API key attempted: {}", mask_api_key(&api_key));
            state.brute_force_guard.record_failure(&ip);
            return Err(AuthError::InvalidApiKey);
        }
    };

    tracing::debug!(
        "Valid API key: {} (user: {})",
        mask_api_key(&api_key),
        user_id
    );

    request.extensions_mut().insert(AuthedUser { user_id });

    Ok(next.run(request).await)
}

/// Extract API key from request headers
pub(crate) fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    // 1. Try X-API-Key header (recommended approach)
    if let Some(api_key) = headers.get("X-API-Key") {
        if let Ok(key) = api_key.to_str() {
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }
    }

    // 2. Try Authorization: Bearer <token> header
    if let Some(auth) = headers.get("Authorization") {
        if let Ok(auth_str) = auth.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if !token.is_empty() {
                    return Ok(token.to_string());
                }
            }
        }
    }

    Err(AuthError::MissingApiKey)
}

/// Get valid API keys from the API_KEYS environment variable.
pub(crate) fn get_valid_api_keys() -> HashMap<String, String> {
    parse_api_keys(&std::env::var("API_KEYS").unwrap_or_default())
}

/// Parse an API key list into a hash -> user id map.
///
/// Format: key1:alice,key2:bob — each key grants access to exactly one
/// user's rows. Entries without a user id are ignored (a key that maps
/// to nobody can never match a row).
///
/// Keys are hashed with SHA-256 before storing so lookups compare
/// fixed-length hashes, eliminating timing side-channels.
pub(crate) fn parse_api_keys(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }

            let (key, user_id) = entry.split_once(':')?;
            let key = key.trim();
            let user_id = user_id.trim();
            if key.is_empty() || user_id.is_empty() {
                return None;
            }

            Some((hash_key(key), user_id.to_string()))
        })
        .collect()
}

/// Mask API key for logging (show first 4 and last 4 characters)
pub(crate) fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        return "****".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}

/// Extension type carrying the authenticated user's identity.
#[derive(Clone, Debug)]
pub struct AuthedUser {
    pub user_id: String,
}

/// Authentication errors
#[derive(Debug)]
pub enum AuthError {
    MissingApiKey,
    InvalidApiKey,
    Locked,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingApiKey => write!(f, "Missing API key"),
            AuthError::InvalidApiKey => write!(f, "Invalid API key"),
            AuthError::Locked => write!(f, "Too many failed authentication attempts"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingApiKey => (
                StatusCode::UNAUTHORIZED,
                "Missing API key. Provide via X-API-Key header or Authorization: Bearer header."
                    .to_string(),
            ),
            AuthError::InvalidApiKey => (StatusCode::FORBIDDEN, "Invalid API key.".to_string()),
            AuthError::Locked => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many failed authentication attempts. Please try again later.".to_string(),
            ),
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response()
    }
}
