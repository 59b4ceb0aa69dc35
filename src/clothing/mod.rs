pub mod repository;

pub use repository::{
    ClothingItemPatch, ClothingRepository, FavoriteToggle, NewClothingItem,
    SqliteClothingRepository,
};
