use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use rusqlite::params;

use crate::error::AppError;
use crate::state::AppState;

/// Represents the currently authenticated user.
///
/// Handlers thread `CurrentUser::id` into every core operation explicitly;
/// nothing below the route layer reads ambient request state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

/// Extractor that requires authentication.
/// Returns 401 if no valid session found.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(parts, &state.config.auth.cookie_name)
            .ok_or(AppError::Unauthorized)?;

        let conn = state.db.get()?;
        conn.query_row(
            "SELECT u.id FROM sessions s \
             JOIN users u ON u.id = s.user_id \
             WHERE s.token = ?1 AND s.expires_at > datetime('now')",
            params![token],
            |row| Ok(CurrentUser { id: row.get(0)? }),
        )
        .map_err(|_| AppError::Unauthorized)
    }
}

fn extract_session_token<'a>(parts: &'a Parts, cookie_name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == cookie_name {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(cookie: &str) -> Parts {
        let request = Request::builder()
            .header(header::COOKIE, cookie)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let parts = parts_with_cookie("theme=dark; garderobe_session=tok123; lang=en");
        assert_eq!(
            extract_session_token(&parts, "garderobe_session"),
            Some("tok123")
        );
    }

    #[test]
    fn missing_cookie_yields_none() {
        let parts = parts_with_cookie("theme=dark");
        assert_eq!(extract_session_token(&parts, "garderobe_session"), None);
    }
}
