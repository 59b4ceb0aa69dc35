use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::db::models::Occasion;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::outfits::{NewOutfit, OutfitRepository, SqliteOutfitRepository};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/outfits", get(list_outfits).post(create_outfit))
        .route("/api/outfits/{id}", get(get_outfit).delete(delete_outfit))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOutfitRequest {
    outfit_parts: Vec<i64>,
    picture: String,
    preview: Vec<String>,
    occasion: String,
}

async fn create_outfit(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateOutfitRequest>,
) -> AppResult<Response> {
    if body.outfit_parts.is_empty() {
        return Err(AppError::BadRequest("Invalid outfit parts".into()));
    }
    if body.picture.is_empty() {
        return Err(AppError::BadRequest("Missing picture or preview".into()));
    }
    let occasion = Occasion::parse(&body.occasion)
        .ok_or_else(|| AppError::BadRequest("Invalid occasion specified".into()))?;

    let repo = SqliteOutfitRepository::new(state.db.clone());
    let outfit = repo
        .create(
            &user.id,
            NewOutfit {
                parts: body.outfit_parts,
                occasion,
                picture: body.picture,
                preview: body.preview,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Outfit created successfully", "outfit": outfit })),
    )
        .into_response())
}

#[derive(Deserialize)]
struct ListParams {
    occasion: Option<String>,
}

async fn list_outfits(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let occasion = params
        .occasion
        .map(|s| {
            Occasion::parse(&s).ok_or_else(|| AppError::BadRequest("Invalid occasion specified".into()))
        })
        .transpose()?;

    let repo = SqliteOutfitRepository::new(state.db.clone());
    let outfits = repo.list(&user.id, occasion).await?;

    Ok(Json(json!({
        "message": "Outfits retrieved successfully",
        "outfits": outfits,
    }))
    .into_response())
}

async fn get_outfit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let repo = SqliteOutfitRepository::new(state.db.clone());
    let outfit = repo.get(&user.id, id).await?;

    Ok(Json(json!({ "message": "Outfit retrieved", "outfit": outfit })).into_response())
}

async fn delete_outfit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let repo = SqliteOutfitRepository::new(state.db.clone());
    repo.delete(&user.id, id).await?;

    Ok(Json(json!({ "message": "Outfit deleted" })).into_response())
}
