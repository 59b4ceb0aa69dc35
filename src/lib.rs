// Library exports for Garderobe
// This allows integration tests and external code to use Garderobe modules

pub mod auth;
pub mod clothing;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod images;
pub mod outfits;
pub mod routes;
pub mod state;
pub mod users;
pub mod wardrobe;
