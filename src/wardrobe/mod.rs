//! Wardrobe Query Service: read-only projections of a user's clothing items,
//! grouped by type and enriched with worn-with neighbors and outfit history.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::db::models::{ClothingType, Color, Occasion};
use crate::error::{AppError, AppResult};
use crate::outfits::ledger::{self, Neighbor};
use crate::state::DbPool;

/// One row of an item's outfit history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitSummary {
    pub id: i64,
    pub picture: String,
    pub occasion: Occasion,
    pub times_worn: i64,
    pub last_worn: Option<String>,
}

/// A clothing item as presented in the grouped wardrobe view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ClothingType,
    pub name: Option<String>,
    pub color: Option<Color>,
    pub picture: Option<String>,
    pub description: Option<String>,
    pub times_worn: i64,
    pub last_worn: Option<String>,
    pub is_favorite: bool,
    pub worn_with: Vec<Neighbor>,
    pub outfits: Vec<OutfitSummary>,
}

pub type GroupedWardrobe = BTreeMap<&'static str, Vec<EnrichedItem>>;

/// Capitalize the first letter and lowercase the rest, for display names.
pub fn capitalize_first_letter(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn outfit_history(conn: &Connection, item_id: i64) -> rusqlite::Result<Vec<OutfitSummary>> {
    let mut stmt = conn.prepare(
        "SELECT o.id, o.picture, o.occasion, o.times_worn, o.last_worn
         FROM outfit_items oi
         JOIN outfits o ON o.id = oi.outfit_id
         WHERE oi.clothing_item_id = ?1
         ORDER BY o.created_at DESC, o.id DESC",
    )?;

    let history = stmt
        .query_map(params![item_id], |row| {
            let occasion_str: String = row.get(2)?;
            let occasion = Occasion::parse(&occasion_str).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    2,
                    rusqlite::types::Type::Text,
                    format!("unknown occasion: {occasion_str}").into(),
                )
            })?;

            Ok(OutfitSummary {
                id: row.get(0)?,
                picture: row.get(1)?,
                occasion,
                times_worn: row.get(3)?,
                last_worn: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(history)
}

/// Fetch the owner's wardrobe grouped by clothing type. Within a group the
/// database return order is preserved. An empty wardrobe is NotFound, a
/// deliberate API contract point rather than an empty success payload.
pub fn get_wardrobe(pool: &DbPool, owner_id: &str) -> AppResult<GroupedWardrobe> {
    let conn = pool.get()?;

    let mut stmt = conn.prepare(
        "SELECT c.id, c.type, c.name, c.color, c.picture, c.description,
                c.times_worn, c.last_worn, c.is_favorite
         FROM wardrobe_items w
         JOIN clothing_items c ON c.id = w.clothing_item_id
         WHERE w.user_id = ?1",
    )?;

    let items = stmt
        .query_map(params![owner_id], |row| {
            let kind_str: String = row.get(1)?;
            let kind = ClothingType::parse(&kind_str).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    format!("unknown clothing type: {kind_str}").into(),
                )
            })?;
            let name: Option<String> = row.get(2)?;
            let color: Option<String> = row.get(3)?;

            Ok(EnrichedItem {
                id: row.get(0)?,
                kind,
                name: name.as_deref().map(capitalize_first_letter),
                color: color.as_deref().and_then(Color::parse),
                picture: row.get(4)?,
                description: row.get(5)?,
                times_worn: row.get(6)?,
                last_worn: row.get(7)?,
                is_favorite: row.get(8)?,
                worn_with: Vec::new(),
                outfits: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    if items.is_empty() {
        return Err(AppError::NotFound);
    }

    let mut grouped: GroupedWardrobe = BTreeMap::new();
    for mut item in items {
        item.worn_with = ledger::neighbors_of(&conn, item.id)?;
        item.outfits = outfit_history(&conn, item.id)?;
        grouped.entry(item.kind.display_name()).or_default().push(item);
    }

    Ok(grouped)
}

/// Pick one random item from each of the Shirt, Pants and Shoes groups.
/// NotFound when the wardrobe lacks any of the three.
pub fn random_outfit(pool: &DbPool, owner_id: &str) -> AppResult<Vec<EnrichedItem>> {
    let wardrobe = get_wardrobe(pool, owner_id)?;
    let mut rng = rand::thread_rng();

    let mut selection = Vec::with_capacity(3);
    for group in ["Shirt", "Pants", "Shoes"] {
        let item = wardrobe
            .get(group)
            .and_then(|items| items.choose(&mut rng))
            .ok_or(AppError::NotFound)?;
        selection.push(item.clone());
    }

    Ok(selection)
}
