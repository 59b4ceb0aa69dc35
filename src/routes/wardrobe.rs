use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::state::AppState;
use crate::wardrobe;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/wardrobe", get(get_wardrobe))
        .route("/api/wardrobe/random", get(random_outfit))
}

/// The grouped, enriched wardrobe. An empty wardrobe is a 404.
async fn get_wardrobe(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let data = wardrobe::get_wardrobe(&state.db, &user.id)?;

    Ok(Json(json!({
        "message": "Wardrobe items retrieved successfully",
        "data": data,
    }))
    .into_response())
}

/// One random shirt, pants and shoes selection from the caller's wardrobe.
async fn random_outfit(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let items = wardrobe::random_outfit(&state.db, &user.id)?;

    Ok(Json(json!({
        "message": "Random outfit generated",
        "data": items,
    }))
    .into_response())
}
