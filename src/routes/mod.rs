pub mod clothing;
pub mod outfits;
pub mod users;
pub mod wardrobe;

use axum::Router;

use crate::state::AppState;

/// The full JSON API surface.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(wardrobe::router())
        .merge(clothing::router())
        .merge(outfits::router())
}
