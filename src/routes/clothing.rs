use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::clothing::{
    ClothingItemPatch, ClothingRepository, FavoriteToggle, NewClothingItem,
    SqliteClothingRepository,
};
use crate::db::models::{ClothingType, Color};
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/clothing", post(create_item))
        .route("/api/clothing/many", post(create_many))
        .route("/api/clothing/upload", post(upload_item))
        .route(
            "/api/clothing/{id}",
            delete(delete_item).patch(update_item),
        )
        .route("/api/clothing/{id}/worn", put(mark_worn))
        .route("/api/clothing/{id}/favorite", put(toggle_favorite))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateItemRequest {
    #[serde(rename = "type")]
    kind: String,
    color: String,
    picture: Option<String>,
    description: Option<String>,
}

impl CreateItemRequest {
    fn into_new_item(self) -> AppResult<NewClothingItem> {
        let kind = ClothingType::parse(&self.kind)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid clothing type: {}", self.kind)))?;
        let color = Color::parse(&self.color)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid color: {}", self.color)))?;

        Ok(NewClothingItem {
            kind,
            color: Some(color),
            picture: self.picture,
            description: self.description,
        })
    }
}

async fn create_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateItemRequest>,
) -> AppResult<Response> {
    let repo = SqliteClothingRepository::new(state.db.clone());
    let item = repo.create(&user.id, body.into_new_item()?).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Item added to wardrobe", "item": item })),
    )
        .into_response())
}

async fn create_many(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<Vec<CreateItemRequest>>,
) -> AppResult<Response> {
    let items = body
        .into_iter()
        .map(CreateItemRequest::into_new_item)
        .collect::<AppResult<Vec<_>>>()?;

    let repo = SqliteClothingRepository::new(state.db.clone());
    let items = repo.create_many(&user.id, items).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Items added to wardrobe", "items": items })),
    )
        .into_response())
}

/// Multipart upload: the image runs through background removal and the image
/// host before the item row is written, so an upstream failure leaves no
/// partial state behind.
async fn upload_item(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Response> {
    let mut kind: Option<String> = None;
    let mut color: Option<String> = None;
    let mut description: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "type" => kind = Some(field.text().await.map_err(bad_field)?),
            "color" => color = Some(field.text().await.map_err(bad_field)?),
            "description" => description = Some(field.text().await.map_err(bad_field)?),
            "image" => image = Some(field.bytes().await.map_err(bad_field)?.to_vec()),
            _ => {}
        }
    }

    let kind = kind.ok_or_else(|| AppError::BadRequest("Missing clothing type".into()))?;
    let color = color.ok_or_else(|| AppError::BadRequest("Missing color".into()))?;
    let image = image.ok_or_else(|| AppError::BadRequest("Missing image".into()))?;

    let request = CreateItemRequest {
        kind,
        color,
        picture: None,
        description,
    };
    let mut new_item = request.into_new_item()?;

    let processed = state.images.remove_background(image).await?;
    let url = state.images.upload(processed).await?;
    new_item.picture = Some(url);

    let repo = SqliteClothingRepository::new(state.db.clone());
    let item = repo.create(&user.id, new_item).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Item added to wardrobe", "item": item })),
    )
        .into_response())
}

fn bad_field(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart field: {e}"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemRequest {
    #[serde(rename = "type")]
    kind: Option<String>,
    color: Option<String>,
    picture: Option<String>,
    description: Option<String>,
}

async fn update_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateItemRequest>,
) -> AppResult<Response> {
    let kind = body
        .kind
        .map(|s| {
            ClothingType::parse(&s)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid clothing type: {s}")))
        })
        .transpose()?;
    let color = body
        .color
        .map(|s| Color::parse(&s).ok_or_else(|| AppError::BadRequest(format!("Invalid color: {s}"))))
        .transpose()?;

    let patch = ClothingItemPatch {
        kind,
        color,
        picture: body.picture,
        description: body.description,
    };

    let repo = SqliteClothingRepository::new(state.db.clone());
    let item = repo.update(&user.id, id, patch).await?;

    Ok(Json(json!({ "message": "Item modified successfully", "item": item })).into_response())
}

async fn delete_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let repo = SqliteClothingRepository::new(state.db.clone());
    repo.delete(&user.id, id).await?;

    Ok(Json(json!({ "message": "Clothing item deleted successfully" })).into_response())
}

async fn mark_worn(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let repo = SqliteClothingRepository::new(state.db.clone());
    let item = repo.mark_worn(&user.id, id).await?;

    Ok(Json(json!({ "message": "Item marked as worn", "item": item })).into_response())
}

async fn toggle_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let repo = SqliteClothingRepository::new(state.db.clone());
    let toggle: FavoriteToggle = repo.toggle_favorite(&user.id, id).await?;

    let message = if toggle.is_favorite {
        "Item added to favorites"
    } else {
        "Item removed from favorites"
    };

    Ok(Json(json!({
        "message": message,
        "item": toggle.item,
        "isFavorite": toggle.is_favorite,
    }))
    .into_response())
}
