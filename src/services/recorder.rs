use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{Interaction, MovieId, UserId};
use crate::session::SessionState;

/// Logs a `shown` interaction for a movie surfaced to the user
///
/// Skipped without touching the store when the session has already surfaced
/// this movie for the active emotion; returns false in that case. Across
/// sessions the write relies on `INSERT OR IGNORE`: the schema admits one
/// unpromoted `shown` row per (user, movie), and an existing one simply
/// stays in place.
pub async fn record_shown(
    pool: &SqlitePool,
    session: &mut SessionState,
    user_id: UserId,
    movie_id: MovieId,
    emotion: &str,
) -> AppResult<bool> {
    if session.already_shown(movie_id) {
        tracing::debug!(user_id, movie_id, "Already surfaced this session, skipping");
        return Ok(false);
    }

    sqlx::query(
        "INSERT OR IGNORE INTO interactions (user_id, movie_id, emotion, interaction_type, date) \
         VALUES (?, ?, ?, 'shown', ?)",
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(emotion)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    session.mark_shown(movie_id);
    Ok(true)
}

/// Promotes a `shown` interaction to `view`
///
/// Rewrites the most recent unpromoted `shown` row in place, refreshing its
/// timestamp; no second row is ever inserted. A view with no prior shown
/// record is a silent no-op, reported as false.
pub async fn record_view(pool: &SqlitePool, user_id: UserId, movie_id: MovieId) -> AppResult<bool> {
    let result = sqlx::query(
        "UPDATE interactions SET interaction_type = 'view', date = ? \
         WHERE id = (SELECT id FROM interactions \
                     WHERE user_id = ? AND movie_id = ? AND interaction_type = 'shown' \
                     ORDER BY date DESC, id DESC LIMIT 1)",
    )
    .bind(Utc::now())
    .bind(user_id)
    .bind(movie_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::debug!(user_id, movie_id, "No shown row to promote, view dropped");
        return Ok(false);
    }

    Ok(true)
}

/// A user's interaction history, oldest first
pub async fn history(pool: &SqlitePool, user_id: UserId) -> AppResult<Vec<Interaction>> {
    let rows = sqlx::query_as::<_, Interaction>(
        "SELECT user_id, movie_id, emotion, interaction_type, date \
         FROM interactions WHERE user_id = ? ORDER BY date, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InteractionType;
    use crate::services::users;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn test_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn test_user(pool: &SqlitePool) -> UserId {
        users::get_or_create(pool, "alice", "secret")
            .await
            .unwrap()
            .user_id
    }

    #[tokio::test]
    async fn test_shown_then_view_leaves_one_view_row() {
        let pool = test_pool().await;
        let user_id = test_user(&pool).await;
        let mut session = SessionState::new();
        session.select_emotion("Happy");

        assert!(record_shown(&pool, &mut session, user_id, 5, "Happy")
            .await
            .unwrap());
        assert!(record_view(&pool, user_id, 5).await.unwrap());

        let rows = history(&pool, user_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].interaction_type, InteractionType::View);
        assert_eq!(rows[0].movie_id, 5);
        assert_eq!(rows[0].emotion, "Happy");
    }

    #[tokio::test]
    async fn test_shown_is_logged_once_per_session() {
        let pool = test_pool().await;
        let user_id = test_user(&pool).await;
        let mut session = SessionState::new();
        session.select_emotion("Happy");

        assert!(record_shown(&pool, &mut session, user_id, 5, "Happy")
            .await
            .unwrap());
        assert!(!record_shown(&pool, &mut session, user_id, 5, "Happy")
            .await
            .unwrap());

        let rows = history(&pool, user_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].interaction_type, InteractionType::Shown);
    }

    #[tokio::test]
    async fn test_reshow_in_later_session_keeps_single_unpromoted_row() {
        let pool = test_pool().await;
        let user_id = test_user(&pool).await;

        let mut first = SessionState::new();
        first.select_emotion("Happy");
        record_shown(&pool, &mut first, user_id, 5, "Happy")
            .await
            .unwrap();

        // A fresh session may surface the same movie again; the existing
        // unpromoted row absorbs the write.
        let mut second = SessionState::new();
        second.select_emotion("Happy");
        record_shown(&pool, &mut second, user_id, 5, "Happy")
            .await
            .unwrap();

        let rows = history(&pool, user_id).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_view_after_promotion_allows_new_shown_row() {
        let pool = test_pool().await;
        let user_id = test_user(&pool).await;

        let mut first = SessionState::new();
        first.select_emotion("Happy");
        record_shown(&pool, &mut first, user_id, 5, "Happy")
            .await
            .unwrap();
        record_view(&pool, user_id, 5).await.unwrap();

        let mut second = SessionState::new();
        second.select_emotion("Scared");
        record_shown(&pool, &mut second, user_id, 5, "Scared")
            .await
            .unwrap();

        let rows = history(&pool, user_id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].interaction_type, InteractionType::View);
        assert_eq!(rows[1].interaction_type, InteractionType::Shown);
        assert_eq!(rows[1].emotion, "Scared");
    }

    #[tokio::test]
    async fn test_view_without_shown_is_a_silent_noop() {
        let pool = test_pool().await;
        let user_id = test_user(&pool).await;

        let promoted = record_view(&pool, user_id, 99).await.unwrap();

        assert!(!promoted);
        assert!(history(&pool, user_id).await.unwrap().is_empty());
    }
}
