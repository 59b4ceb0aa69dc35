pub mod ledger;
pub mod repository;

pub use repository::{NewOutfit, OutfitRepository, SqliteOutfitRepository};
