use rusqlite::params;

use crate::db::models::User;
use crate::error::AppResult;
use crate::state::DbPool;

/// Outcome of a login upsert.
pub struct LoginResult {
    pub user: User,
    pub created: bool,
}

/// Look up a user by external identity, creating one on first visit.
/// Insert-or-ignore, so two concurrent first logins converge on one row.
pub fn find_or_create_user(pool: &DbPool, external_id: &str) -> AppResult<LoginResult> {
    let conn = pool.get()?;

    let id = uuid::Uuid::now_v7().to_string();
    let created = conn.execute(
        "INSERT OR IGNORE INTO users (id, external_id) VALUES (?1, ?2)",
        params![id, external_id],
    )? == 1;

    let user = conn.query_row(
        "SELECT id, external_id, created_at FROM users WHERE external_id = ?1",
        params![external_id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                external_id: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )?;

    Ok(LoginResult { user, created })
}
