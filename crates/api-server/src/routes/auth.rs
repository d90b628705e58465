//! Login/refresh endpoints for the auth prototype.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::{
    issue_token, verify_credentials, verify_token, ACCESS_TOKEN_TTL_MINUTES,
    REFRESH_TOKEN_TTL_DAYS,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type RouteError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    refresh_token: String,
}

#[derive(Debug, Serialize)]
struct AccessTokenResponse {
    access_token: String,
    token_type: String,
}

#[derive(Debug, Serialize)]
struct MeResponse {
    username: String,
}

fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn unauthorized(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::UNAUTHORIZED, error)
}

fn internal_error(error: impl std::fmt::Display) -> RouteError {
    tracing::error!("Auth error: {}", error);
    route_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// POST /token - Exchange form credentials for an access/refresh pair
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, RouteError> {
    if !verify_credentials(&form.username, &form.password) {
        return Err(route_error(
            StatusCode::BAD_REQUEST,
            "Incorrect username or password",
        ));
    }

    let access_token = issue_token(
        state.secret_key(),
        &form.username,
        Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
    )
    .map_err(internal_error)?;
    let refresh_token = issue_token(
        state.secret_key(),
        &form.username,
        Duration::days(REFRESH_TOKEN_TTL_DAYS),
    )
    .map_err(internal_error)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        refresh_token,
    }))
}

/// POST /token/refresh - Trade a refresh token for a new access token
async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, RouteError> {
    let claims = verify_token(state.secret_key(), &req.refresh_token)
        .map_err(|_| unauthorized("Invalid or expired refresh token"))?;

    let access_token = issue_token(
        state.secret_key(),
        &claims.sub,
        Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
    )
    .map_err(internal_error)?;

    Ok(Json(AccessTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /users/me - Identify the caller from a bearer token
async fn users_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, RouteError> {
    let token = bearer_token(&headers).ok_or_else(|| unauthorized("Invalid token"))?;
    let claims =
        verify_token(state.secret_key(), token).map_err(|_| unauthorized("Invalid token"))?;

    Ok(Json(MeResponse {
        username: claims.sub,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(login))
        .route("/token/refresh", post(refresh))
        .route("/users/me", get(users_me))
}
