// Repository pattern - isolates all outfit database side effects, including
// the assembly transaction that feeds the co-occurrence ledger.
use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::clothing::repository::ensure_owned;
use crate::db::models::{ClothingType, Color, ItemSummary, Occasion, Outfit};
use crate::error::{AppError, AppResult};
use crate::outfits::ledger;
use crate::state::DbPool;

#[derive(Debug, Clone)]
pub struct NewOutfit {
    /// Selected item ids in presentation order.
    pub parts: Vec<i64>,
    pub occasion: Occasion,
    /// Composite preview image, supplied by the client-side image pipeline.
    pub picture: String,
    /// Per-item thumbnail URLs.
    pub preview: Vec<String>,
}

/// Repository trait - all outfit database operations.
/// Caller identity is an explicit parameter on every operation.
#[async_trait]
pub trait OutfitRepository: Send + Sync {
    /// Assemble an outfit: one atomic transaction inserting the outfit row, its
    /// item joins, and the pairwise worn-with ledger updates.
    async fn create(&self, owner_id: &str, outfit: NewOutfit) -> AppResult<Outfit>;

    /// The caller's outfits, newest-created first, optionally filtered by occasion.
    async fn list(&self, owner_id: &str, occasion: Option<Occasion>) -> AppResult<Vec<Outfit>>;

    /// A single outfit, ownership-checked.
    async fn get(&self, owner_id: &str, outfit_id: i64) -> AppResult<Outfit>;

    /// Ownership-checked delete. Join rows cascade; worn-with counters are
    /// historical tallies and stay untouched.
    async fn delete(&self, owner_id: &str, outfit_id: i64) -> AppResult<()>;
}

pub struct SqliteOutfitRepository {
    pool: DbPool,
}

impl SqliteOutfitRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn outfit_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Outfit> {
    let occasion_str: String = row.get(1)?;
    let occasion = Occasion::parse(&occasion_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown occasion: {occasion_str}").into(),
        )
    })?;
    let preview_json: String = row.get(3)?;
    let preview: Vec<String> = serde_json::from_str(&preview_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(Outfit {
        id: row.get(0)?,
        occasion,
        picture: row.get(2)?,
        preview,
        times_worn: row.get(4)?,
        last_worn: row.get(5)?,
        is_used: row.get(6)?,
        is_worn: row.get(7)?,
        items: Vec::new(),
    })
}

/// Resolve an outfit's item list in selection order.
fn outfit_items(conn: &Connection, outfit_id: i64) -> rusqlite::Result<Vec<ItemSummary>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.type, c.name, c.color, c.picture
         FROM outfit_items oi
         JOIN clothing_items c ON c.id = oi.clothing_item_id
         WHERE oi.outfit_id = ?1
         ORDER BY oi.position",
    )?;

    let items = stmt
        .query_map(params![outfit_id], |row| {
            let kind_str: String = row.get(1)?;
            let kind = ClothingType::parse(&kind_str).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    format!("unknown clothing type: {kind_str}").into(),
                )
            })?;
            let color: Option<String> = row.get(3)?;

            Ok(ItemSummary {
                id: row.get(0)?,
                kind,
                name: row.get(2)?,
                color: color.as_deref().and_then(Color::parse),
                picture: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}

fn load_outfit(conn: &Connection, owner_id: &str, outfit_id: i64) -> AppResult<Outfit> {
    let mut outfit = conn
        .query_row(
            "SELECT id, occasion, picture, preview, times_worn, last_worn, is_used, is_worn
             FROM outfits WHERE id = ?1 AND user_id = ?2",
            params![outfit_id, owner_id],
            outfit_from_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::NotFound,
            other => other.into(),
        })?;

    outfit.items = outfit_items(conn, outfit.id)?;
    Ok(outfit)
}

/// Distinct part ids in first-seen order.
fn dedupe_parts(parts: &[i64]) -> Vec<i64> {
    let mut seen = Vec::with_capacity(parts.len());
    for &id in parts {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

#[async_trait]
impl OutfitRepository for SqliteOutfitRepository {
    async fn create(&self, owner_id: &str, outfit: NewOutfit) -> AppResult<Outfit> {
        // All validation happens before the transaction starts; a rejected
        // request performs zero writes.
        if outfit.parts.is_empty() {
            return Err(AppError::BadRequest("Invalid outfit parts".into()));
        }
        if outfit.picture.is_empty() {
            return Err(AppError::BadRequest("Missing picture or preview".into()));
        }

        let parts = dedupe_parts(&outfit.parts);

        let conn = self.pool.get()?;
        for &item_id in &parts {
            ensure_owned(&conn, owner_id, item_id).map_err(|e| match e {
                AppError::NotFound => {
                    AppError::BadRequest(format!("Unknown outfit part: {item_id}"))
                }
                other => other,
            })?;
        }

        let preview_json = serde_json::to_string(&outfit.preview)?;

        conn.execute("BEGIN IMMEDIATE", [])?;
        let result: AppResult<i64> = (|| {
            conn.execute(
                "INSERT INTO outfits (user_id, occasion, picture, preview,
                                      times_worn, last_worn, is_used, is_worn)
                 VALUES (?1, ?2, ?3, ?4, 0, NULL, 1, 0)",
                params![owner_id, outfit.occasion.as_str(), outfit.picture, preview_json],
            )?;
            let outfit_id = conn.last_insert_rowid();

            for (position, &item_id) in parts.iter().enumerate() {
                conn.execute(
                    "INSERT INTO outfit_items (outfit_id, clothing_item_id, position)
                     VALUES (?1, ?2, ?3)",
                    params![outfit_id, item_id, position as i64],
                )?;
            }

            ledger::record_pairs(&conn, &parts)?;

            Ok(outfit_id)
        })();

        match result {
            Ok(outfit_id) => {
                conn.execute("COMMIT", [])?;
                load_outfit(&conn, owner_id, outfit_id)
            }
            Err(e) => {
                conn.execute("ROLLBACK", [])?;
                Err(e)
            }
        }
    }

    async fn list(&self, owner_id: &str, occasion: Option<Occasion>) -> AppResult<Vec<Outfit>> {
        let conn = self.pool.get()?;

        let mut outfits = match occasion {
            Some(occasion) => {
                let mut stmt = conn.prepare(
                    "SELECT id, occasion, picture, preview, times_worn, last_worn, is_used, is_worn
                     FROM outfits WHERE user_id = ?1 AND occasion = ?2
                     ORDER BY created_at DESC, id DESC",
                )?;
                let rows = stmt
                    .query_map(params![owner_id, occasion.as_str()], outfit_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, occasion, picture, preview, times_worn, last_worn, is_used, is_worn
                     FROM outfits WHERE user_id = ?1
                     ORDER BY created_at DESC, id DESC",
                )?;
                let rows = stmt
                    .query_map(params![owner_id], outfit_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        for outfit in &mut outfits {
            outfit.items = outfit_items(&conn, outfit.id)?;
        }

        Ok(outfits)
    }

    async fn get(&self, owner_id: &str, outfit_id: i64) -> AppResult<Outfit> {
        let conn = self.pool.get()?;
        load_outfit(&conn, owner_id, outfit_id)
    }

    async fn delete(&self, owner_id: &str, outfit_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let deleted = conn.execute(
            "DELETE FROM outfits WHERE id = ?1 AND user_id = ?2",
            params![outfit_id, owner_id],
        )?;

        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
