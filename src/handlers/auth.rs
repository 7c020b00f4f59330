use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    middleware::AuthUser,
    password::{hash_password, verify_password},
    session::{cleared_cookie, expires_at, generate_token, hash_token, session_cookie, SESSION_COOKIE},
};
use crate::error::{AppError, AppResult};
use crate::models::user::{NewUser, UserProfile};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub ok: bool,
    pub user: UserProfile,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Persist a new session and attach its cookie.
async fn start_session(state: &AppState, jar: CookieJar, user_id: Uuid) -> AppResult<CookieJar> {
    let token = generate_token();
    let ttl = state.config.session_ttl_secs;
    state
        .accounts
        .create_session(user_id, &hash_token(&token), expires_at(Utc::now(), ttl))
        .await?;
    Ok(jar.add(session_cookie(token, ttl, state.config.secure_cookies)))
}

pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut body): Json<SignUpRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    body.username = body.username.trim().to_string();
    body.email = normalize_email(&body.email);
    body.validate()?;
    if body.password != body.confirm_password {
        return Err(AppError::Validation("Passwords do not match".into()));
    }

    let user = state
        .accounts
        .create_user(NewUser {
            email: body.email,
            username: body.username,
            password_hash: hash_password(&body.password)?,
        })
        .await?;
    tracing::info!(user_id = %user.id, "User signed up");

    let jar = start_session(&state, jar, user.id).await?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            ok: true,
            user: user.into(),
        }),
    ))
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut body): Json<SignInRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    body.email = normalize_email(&body.email);
    body.validate()?;

    let user = state
        .accounts
        .find_user_by_email(&body.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Wrong password");
        return Err(AppError::Unauthorized);
    }

    let jar = start_session(&state, jar, user.id).await?;
    Ok((
        jar,
        Json(AuthResponse {
            ok: true,
            user: user.into(),
        }),
    ))
}

/// Always succeeds; an unknown or missing cookie is simply cleared.
pub async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<serde_json::Value>)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state
            .accounts
            .delete_session(&hash_token(cookie.value()))
            .await?;
    }
    Ok((jar.remove(cleared_cookie()), Json(serde_json::json!({ "ok": true }))))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .accounts
        .find_user(auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}
