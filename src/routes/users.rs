use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::auth::session;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::users;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users/login", post(login))
        .route("/api/users/logout", post(logout))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    external_id: String,
}

/// Login upsert: resolve the external identity to a user, creating one on
/// first visit, and open a session.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Response> {
    if body.external_id.trim().is_empty() {
        return Err(AppError::BadRequest("Missing external id".into()));
    }

    let result = users::find_or_create_user(&state.db, &body.external_id)?;
    let token = session::create_session(&state.db, &result.user.id, state.config.auth.session_hours)?;

    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/",
        state.config.auth.cookie_name, token
    );

    let (status, message) = if result.created {
        (StatusCode::CREATED, "User created")
    } else {
        (StatusCode::OK, "Welcome back")
    };

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": message, "user": result.user })),
    )
        .into_response())
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let token = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            cookie
                .strip_prefix(state.config.auth.cookie_name.as_str())
                .and_then(|rest| rest.strip_prefix('='))
        })
        .ok_or(AppError::Unauthorized)?;

    session::delete_session(&state.db, token)?;

    let clear = format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        state.config.auth.cookie_name
    );

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear)],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response())
}
