use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::session::{hash_token, SESSION_COOKIE};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Resolve the session cookie to a user, or reject with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let token_hash = hash_token(token);
    let session = state
        .accounts
        .find_session(&token_hash)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if session.is_expired(Utc::now()) {
        tracing::debug!(user_id = %session.user_id, "Session expired");
        state.accounts.delete_session(&token_hash).await?;
        return Err(AppError::Unauthorized);
    }

    req.extensions_mut().insert(AuthUser {
        id: session.user_id,
    });
    Ok(next.run(req).await)
}
