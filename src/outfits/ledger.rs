//! Co-occurrence ledger: for every unordered pair of items that has ever
//! appeared together in a saved outfit, both directed edges exist and their
//! counters move together. Counters are historical tallies; deleting an outfit
//! never decrements them.

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::db::models::{ClothingType, Color, ItemSummary};

/// A co-occurrence partner of some item, with the shared-wear count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighbor {
    #[serde(flatten)]
    pub item: ItemSummary,
    pub times_worn_together: i64,
}

/// Record one co-occurrence event for every unordered pair drawn from `parts`.
/// Each pair is visited exactly once; the caller (the assembly transaction) is
/// responsible for invoking this once per outfit creation.
pub fn record_pairs(conn: &Connection, parts: &[i64]) -> rusqlite::Result<()> {
    for (i, &item) in parts.iter().enumerate() {
        for &worn_with in &parts[i + 1..] {
            upsert_edge(conn, item, worn_with)?;
            upsert_edge(conn, worn_with, item)?;
        }
    }
    Ok(())
}

/// Increment-or-insert a single directed edge as one atomic statement, so
/// concurrent writers on the same pair cannot lose updates.
fn upsert_edge(conn: &Connection, item_id: i64, worn_with_item_id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO worn_with_items (item_id, worn_with_item_id, times_worn_together)
         VALUES (?1, ?2, 1)
         ON CONFLICT(item_id, worn_with_item_id) DO UPDATE SET
           times_worn_together = times_worn_together + 1",
        params![item_id, worn_with_item_id],
    )?;
    Ok(())
}

/// Read projection: everything `item_id` has been worn with, most-worn first.
pub fn neighbors_of(conn: &Connection, item_id: i64) -> rusqlite::Result<Vec<Neighbor>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.type, c.name, c.color, c.picture, w.times_worn_together
         FROM worn_with_items w
         JOIN clothing_items c ON c.id = w.worn_with_item_id
         WHERE w.item_id = ?1
         ORDER BY w.times_worn_together DESC, c.id",
    )?;

    let neighbors = stmt
        .query_map(params![item_id], |row| {
            let kind_str: String = row.get(1)?;
            let kind = ClothingType::parse(&kind_str).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    format!("unknown clothing type: {kind_str}").into(),
                )
            })?;
            let color: Option<String> = row.get(3)?;

            Ok(Neighbor {
                item: ItemSummary {
                    id: row.get(0)?,
                    kind,
                    name: row.get(2)?,
                    color: color.as_deref().and_then(Color::parse),
                    picture: row.get(4)?,
                },
                times_worn_together: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(neighbors)
}
