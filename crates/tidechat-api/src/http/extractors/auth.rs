//! Principal extraction.
//!
//! Resolves the optional authenticated principal for a request from:
//! - `Authorization: Bearer <token>` header
//! - `session` cookie
//!
//! Tokens are opaque, SHA-256 hashed, and compared against the
//! `auth_sessions` table (the auth layer that issues them is an external
//! collaborator). Absence of a token is not an error: anonymous requests
//! are valid when anonymous chats are enabled, so the extractor yields
//! `None` instead of rejecting.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use sha2::{Digest, Sha256};
use sqlx::Row;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated user attached to a request.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: Uuid,
}

/// Optional-principal extractor. A bad token is simply no principal; only
/// a storage failure rejects the request.
pub struct MaybePrincipal(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybePrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_token(parts) else {
            return Ok(MaybePrincipal(None));
        };

        let token_hash = hash_token(&token);

        let row = sqlx::query("SELECT user_id FROM auth_sessions WHERE token_hash = ?")
            .bind(&token_hash)
            .fetch_optional(&state.db_pool.reader)
            .await
            .map_err(|e| AppError::Internal(format!("session lookup failed: {e}")))?;

        match row {
            Some(row) => {
                let user_id: String = row.get("user_id");
                let user_id = user_id
                    .parse::<Uuid>()
                    .map_err(|e| AppError::Internal(format!("invalid session user_id: {e}")))?;

                // Update last_used_at (best effort, don't fail the request)
                let now = chrono::Utc::now().to_rfc3339();
                let _ = sqlx::query(
                    "UPDATE auth_sessions SET last_used_at = ? WHERE token_hash = ?",
                )
                .bind(&now)
                .bind(&token_hash)
                .execute(&state.db_pool.writer)
                .await;

                Ok(MaybePrincipal(Some(Principal { user_id })))
            }
            None => Ok(MaybePrincipal(None)),
        }
    }
}

/// Extract the session token from the request, if any.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(auth) = parts.headers.get("authorization") {
        if let Ok(auth_str) = auth.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let jar = CookieJar::from_headers(&parts.headers);
    jar.get("session").map(|c| c.value().to_string())
}

/// Compute the SHA-256 hash of a session token (lowercase hex).
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}
