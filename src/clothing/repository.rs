// Repository pattern - isolates all clothing-item database side effects
use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::db::models::{ClothingItem, ClothingType, Color};
use crate::error::{AppError, AppResult};
use crate::state::DbPool;

const ITEM_COLUMNS: &str = "id, type, name, color, picture, description, \
     times_worn, last_worn, is_favorite, is_available, is_deleted";

#[derive(Debug, Clone)]
pub struct NewClothingItem {
    pub kind: ClothingType,
    pub color: Option<Color>,
    pub picture: Option<String>,
    pub description: Option<String>,
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Clone, Default)]
pub struct ClothingItemPatch {
    pub kind: Option<ClothingType>,
    pub color: Option<Color>,
    pub picture: Option<String>,
    pub description: Option<String>,
}

impl ClothingItemPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.color.is_none()
            && self.picture.is_none()
            && self.description.is_none()
    }
}

pub struct FavoriteToggle {
    pub item: ClothingItem,
    pub is_favorite: bool,
}

/// Repository trait - all clothing-item database operations.
/// Caller identity is an explicit parameter on every operation.
#[async_trait]
pub trait ClothingRepository: Send + Sync {
    /// Insert an item and its ownership row atomically.
    async fn create(&self, owner_id: &str, item: NewClothingItem) -> AppResult<ClothingItem>;

    /// Bulk insert; all items and ownership rows land in one transaction.
    async fn create_many(
        &self,
        owner_id: &str,
        items: Vec<NewClothingItem>,
    ) -> AppResult<Vec<ClothingItem>>;

    /// Partial update with derived-name recomputation; ownership-checked.
    async fn update(
        &self,
        owner_id: &str,
        item_id: i64,
        patch: ClothingItemPatch,
    ) -> AppResult<ClothingItem>;

    /// Ownership-checked hard delete; join rows cascade.
    async fn delete(&self, owner_id: &str, item_id: i64) -> AppResult<()>;

    /// Increment wear counters as one atomic UPDATE.
    async fn mark_worn(&self, owner_id: &str, item_id: i64) -> AppResult<ClothingItem>;

    /// Flip favorite membership and mirror the flag onto the item.
    async fn toggle_favorite(&self, owner_id: &str, item_id: i64) -> AppResult<FavoriteToggle>;
}

pub struct SqliteClothingRepository {
    pool: DbPool,
}

impl SqliteClothingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Display name derived from color and type, e.g. "blue shirt".
pub fn derived_name(color: Option<Color>, kind: ClothingType) -> String {
    match color {
        Some(color) => format!("{} {}", color.as_str(), kind.as_str()).to_lowercase(),
        None => kind.as_str().to_lowercase(),
    }
}

pub(crate) fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClothingItem> {
    let kind_str: String = row.get(1)?;
    let kind = ClothingType::parse(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown clothing type: {kind_str}").into(),
        )
    })?;
    let color: Option<String> = row.get(3)?;

    Ok(ClothingItem {
        id: row.get(0)?,
        kind,
        name: row.get(2)?,
        color: color.as_deref().and_then(Color::parse),
        picture: row.get(4)?,
        description: row.get(5)?,
        times_worn: row.get(6)?,
        last_worn: row.get(7)?,
        is_favorite: row.get(8)?,
        is_available: row.get(9)?,
        is_deleted: row.get(10)?,
    })
}

pub(crate) fn load_item(conn: &Connection, item_id: i64) -> AppResult<ClothingItem> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM clothing_items WHERE id = ?1"),
        params![item_id],
        item_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound,
        other => other.into(),
    })
}

/// Ownership test via the wardrobe join row. Absent and not-owned are the same
/// NotFound to the caller.
pub(crate) fn ensure_owned(conn: &Connection, owner_id: &str, item_id: i64) -> AppResult<()> {
    let owned: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM wardrobe_items WHERE user_id = ?1 AND clothing_item_id = ?2",
        params![owner_id, item_id],
        |row| row.get(0),
    )?;
    if owned {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

fn insert_item(conn: &Connection, owner_id: &str, item: &NewClothingItem) -> AppResult<i64> {
    let name = derived_name(item.color, item.kind);
    conn.execute(
        "INSERT INTO clothing_items (type, name, color, picture, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            item.kind.as_str(),
            name,
            item.color.map(|c| c.as_str()),
            item.picture,
            item.description
        ],
    )?;
    let item_id = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO wardrobe_items (user_id, clothing_item_id) VALUES (?1, ?2)",
        params![owner_id, item_id],
    )?;

    Ok(item_id)
}

#[async_trait]
impl ClothingRepository for SqliteClothingRepository {
    async fn create(&self, owner_id: &str, item: NewClothingItem) -> AppResult<ClothingItem> {
        let conn = self.pool.get()?;

        conn.execute("BEGIN IMMEDIATE", [])?;
        let result: AppResult<i64> = insert_item(&conn, owner_id, &item);

        match result {
            Ok(item_id) => {
                conn.execute("COMMIT", [])?;
                load_item(&conn, item_id)
            }
            Err(e) => {
                conn.execute("ROLLBACK", [])?;
                Err(e)
            }
        }
    }

    async fn create_many(
        &self,
        owner_id: &str,
        items: Vec<NewClothingItem>,
    ) -> AppResult<Vec<ClothingItem>> {
        if items.is_empty() {
            return Err(AppError::BadRequest("No items provided".into()));
        }

        let conn = self.pool.get()?;

        conn.execute("BEGIN IMMEDIATE", [])?;
        let result: AppResult<Vec<i64>> = items
            .iter()
            .map(|item| insert_item(&conn, owner_id, item))
            .collect();

        match result {
            Ok(ids) => {
                conn.execute("COMMIT", [])?;
                ids.into_iter().map(|id| load_item(&conn, id)).collect()
            }
            Err(e) => {
                conn.execute("ROLLBACK", [])?;
                Err(e)
            }
        }
    }

    async fn update(
        &self,
        owner_id: &str,
        item_id: i64,
        patch: ClothingItemPatch,
    ) -> AppResult<ClothingItem> {
        if patch.is_empty() {
            return Err(AppError::BadRequest("No fields to update".into()));
        }

        let conn = self.pool.get()?;
        ensure_owned(&conn, owner_id, item_id)?;

        let base = load_item(&conn, item_id)?;

        let kind = patch.kind.unwrap_or(base.kind);
        let color = patch.color.or(base.color);
        let picture = patch.picture.or(base.picture);
        let description = patch.description.or(base.description);

        // The display name tracks the merged color and type whenever either moves
        let name = if patch.kind.is_some() || patch.color.is_some() {
            derived_name(color, kind)
        } else {
            base.name.unwrap_or_else(|| derived_name(color, kind))
        };

        conn.execute(
            "UPDATE clothing_items
             SET type = ?1, name = ?2, color = ?3, picture = ?4, description = ?5,
                 updated_at = datetime('now')
             WHERE id = ?6",
            params![
                kind.as_str(),
                name,
                color.map(|c| c.as_str()),
                picture,
                description,
                item_id
            ],
        )?;

        load_item(&conn, item_id)
    }

    async fn delete(&self, owner_id: &str, item_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        ensure_owned(&conn, owner_id, item_id)?;

        conn.execute("DELETE FROM clothing_items WHERE id = ?1", params![item_id])?;
        Ok(())
    }

    async fn mark_worn(&self, owner_id: &str, item_id: i64) -> AppResult<ClothingItem> {
        let conn = self.pool.get()?;
        ensure_owned(&conn, owner_id, item_id)?;

        conn.execute(
            "UPDATE clothing_items
             SET times_worn = times_worn + 1, last_worn = datetime('now'),
                 updated_at = datetime('now')
             WHERE id = ?1",
            params![item_id],
        )?;

        load_item(&conn, item_id)
    }

    async fn toggle_favorite(&self, owner_id: &str, item_id: i64) -> AppResult<FavoriteToggle> {
        let conn = self.pool.get()?;
        ensure_owned(&conn, owner_id, item_id)?;

        conn.execute("BEGIN IMMEDIATE", [])?;
        let result: AppResult<bool> = (|| {
            let existing: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM favorite_items
                 WHERE user_id = ?1 AND clothing_item_id = ?2",
                params![owner_id, item_id],
                |row| row.get(0),
            )?;

            let is_favorite = if existing {
                conn.execute(
                    "DELETE FROM favorite_items WHERE user_id = ?1 AND clothing_item_id = ?2",
                    params![owner_id, item_id],
                )?;
                false
            } else {
                conn.execute(
                    "INSERT INTO favorite_items (user_id, clothing_item_id) VALUES (?1, ?2)",
                    params![owner_id, item_id],
                )?;
                true
            };

            conn.execute(
                "UPDATE clothing_items SET is_favorite = ?1, updated_at = datetime('now')
                 WHERE id = ?2",
                params![is_favorite, item_id],
            )?;

            Ok(is_favorite)
        })();

        match result {
            Ok(is_favorite) => {
                conn.execute("COMMIT", [])?;
                let item = load_item(&conn, item_id)?;
                Ok(FavoriteToggle { item, is_favorite })
            }
            Err(e) => {
                conn.execute("ROLLBACK", [])?;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn create_test_repo() -> (SqliteClothingRepository, DbPool) {
        let pool = db::test_pool();
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (id, external_id) VALUES ('u1', 'ext1'), ('u2', 'ext2')",
            [],
        )
        .unwrap();
        drop(conn);
        (SqliteClothingRepository::new(pool.clone()), pool)
    }

    fn blue_shirt() -> NewClothingItem {
        NewClothingItem {
            kind: ClothingType::Shirt,
            color: Some(Color::Blue),
            picture: Some("https://img.example/shirt.png".into()),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_inserts_item_and_ownership_row() {
        let (repo, pool) = create_test_repo();

        let item = repo.create("u1", blue_shirt()).await.unwrap();
        assert_eq!(item.kind, ClothingType::Shirt);
        assert_eq!(item.name.as_deref(), Some("blue shirt"));
        assert_eq!(item.times_worn, 0);
        assert!(!item.is_favorite);

        let conn = pool.get().unwrap();
        let owned: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM wardrobe_items WHERE user_id = 'u1' AND clothing_item_id = ?1",
                params![item.id],
                |row| row.get(0),
            )
            .unwrap();
        assert!(owned);
    }

    #[tokio::test]
    async fn create_many_is_one_transaction() {
        let (repo, pool) = create_test_repo();

        let items = repo
            .create_many(
                "u1",
                vec![
                    blue_shirt(),
                    NewClothingItem {
                        kind: ClothingType::Pants,
                        color: Some(Color::Black),
                        picture: None,
                        description: None,
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!(items.len(), 2);

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM wardrobe_items WHERE user_id = 'u1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn create_many_rejects_empty_batch() {
        let (repo, _pool) = create_test_repo();
        let result = repo.create_many("u1", vec![]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn update_recomputes_name_when_color_changes() {
        let (repo, _pool) = create_test_repo();
        let item = repo.create("u1", blue_shirt()).await.unwrap();

        let updated = repo
            .update(
                "u1",
                item.id,
                ClothingItemPatch {
                    color: Some(Color::Red),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.color, Some(Color::Red));
        assert_eq!(updated.name.as_deref(), Some("red shirt"));
    }

    #[tokio::test]
    async fn update_keeps_name_when_only_picture_changes() {
        let (repo, _pool) = create_test_repo();
        let item = repo.create("u1", blue_shirt()).await.unwrap();

        let updated = repo
            .update(
                "u1",
                item.id,
                ClothingItemPatch {
                    picture: Some("https://img.example/new.png".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("blue shirt"));
        assert_eq!(updated.picture.as_deref(), Some("https://img.example/new.png"));
    }

    #[tokio::test]
    async fn update_rejects_empty_patch() {
        let (repo, _pool) = create_test_repo();
        let item = repo.create("u1", blue_shirt()).await.unwrap();
        let result = repo
            .update("u1", item.id, ClothingItemPatch::default())
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn other_users_items_look_absent() {
        let (repo, _pool) = create_test_repo();
        let item = repo.create("u1", blue_shirt()).await.unwrap();

        let update = repo
            .update(
                "u2",
                item.id,
                ClothingItemPatch {
                    color: Some(Color::Red),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(update, Err(AppError::NotFound)));

        let delete = repo.delete("u2", item.id).await;
        assert!(matches!(delete, Err(AppError::NotFound)));

        let worn = repo.mark_worn("u2", item.id).await;
        assert!(matches!(worn, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn delete_removes_item_and_joins() {
        let (repo, pool) = create_test_repo();
        let item = repo.create("u1", blue_shirt()).await.unwrap();

        repo.delete("u1", item.id).await.unwrap();

        let conn = pool.get().unwrap();
        let items: i64 = conn
            .query_row("SELECT COUNT(*) FROM clothing_items", [], |row| row.get(0))
            .unwrap();
        let joins: i64 = conn
            .query_row("SELECT COUNT(*) FROM wardrobe_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(items, 0);
        assert_eq!(joins, 0);
    }

    #[tokio::test]
    async fn mark_worn_increments_and_stamps() {
        let (repo, _pool) = create_test_repo();
        let item = repo.create("u1", blue_shirt()).await.unwrap();

        let worn = repo.mark_worn("u1", item.id).await.unwrap();
        assert_eq!(worn.times_worn, 1);
        assert!(worn.last_worn.is_some());

        let worn = repo.mark_worn("u1", item.id).await.unwrap();
        assert_eq!(worn.times_worn, 2);
    }

    #[tokio::test]
    async fn toggle_favorite_round_trips() {
        let (repo, pool) = create_test_repo();
        let item = repo.create("u1", blue_shirt()).await.unwrap();

        let on = repo.toggle_favorite("u1", item.id).await.unwrap();
        assert!(on.is_favorite);
        assert!(on.item.is_favorite);

        let conn = pool.get().unwrap();
        let favorites: i64 = conn
            .query_row("SELECT COUNT(*) FROM favorite_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(favorites, 1);
        drop(conn);

        let off = repo.toggle_favorite("u1", item.id).await.unwrap();
        assert!(!off.is_favorite);
        assert!(!off.item.is_favorite);

        let conn = pool.get().unwrap();
        let favorites: i64 = conn
            .query_row("SELECT COUNT(*) FROM favorite_items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(favorites, 0);
    }

    #[test]
    fn derived_name_lowercases_color_and_type() {
        assert_eq!(
            derived_name(Some(Color::Beige), ClothingType::Jumper),
            "beige jumper"
        );
        assert_eq!(derived_name(None, ClothingType::Shoes), "shoes");
    }
}
