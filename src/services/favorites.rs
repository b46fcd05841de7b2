use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{Favorite, FavoriteOutcome, MovieId, Rating, UserId};

/// Adds a movie to the user's favorites
///
/// Idempotent: a repeat request reports `AlreadyFavorited` and changes
/// nothing.
pub async fn add_favorite(
    pool: &SqlitePool,
    user_id: UserId,
    movie_id: MovieId,
) -> AppResult<FavoriteOutcome> {
    let result = sqlx::query(
        "INSERT INTO favorites (user_id, movie_id, date_added) VALUES (?, ?, ?) \
         ON CONFLICT (user_id, movie_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(user_id, movie_id, "Movie already in favorites");
        return Ok(FavoriteOutcome::AlreadyFavorited);
    }

    tracing::info!(user_id, movie_id, "Added to favorites");
    Ok(FavoriteOutcome::Added)
}

/// Removes a movie from the user's favorites
///
/// Deletes the rating and the favorite inside one transaction so a crash
/// can never strand a rating without its favorite. Succeeds as a no-op when
/// nothing was favorited.
pub async fn remove_favorite(
    pool: &SqlitePool,
    user_id: UserId,
    movie_id: MovieId,
) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM ratings WHERE user_id = ? AND movie_id = ?")
        .bind(user_id)
        .bind(movie_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND movie_id = ?")
        .bind(user_id)
        .bind(movie_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    if result.rows_affected() > 0 {
        tracing::info!(user_id, movie_id, "Removed from favorites");
    }

    Ok(())
}

/// Inserts or updates the user's rating of a favorited movie
///
/// The score is validated before any write; the favorite is verified inside
/// the same transaction, since a rating may never exist without one.
pub async fn upsert_rating(
    pool: &SqlitePool,
    user_id: UserId,
    movie_id: MovieId,
    rating: i64,
) -> AppResult<()> {
    if !(1..=10).contains(&rating) {
        return Err(AppError::InvalidInput(format!(
            "rating {} is outside the 1-10 scale",
            rating
        )));
    }

    let mut tx = pool.begin().await?;

    let favorited: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM favorites WHERE user_id = ? AND movie_id = ?")
            .bind(user_id)
            .bind(movie_id)
            .fetch_optional(&mut *tx)
            .await?;

    if favorited.is_none() {
        return Err(AppError::NotFound(format!(
            "movie {} is not in the user's favorites",
            movie_id
        )));
    }

    sqlx::query(
        "INSERT INTO ratings (user_id, movie_id, rating, date) VALUES (?, ?, ?, ?) \
         ON CONFLICT (user_id, movie_id) DO UPDATE SET rating = excluded.rating, date = excluded.date",
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(rating)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user_id, movie_id, rating, "Rating saved");
    Ok(())
}

/// The user's rating of a movie, if one exists
pub async fn get_rating(
    pool: &SqlitePool,
    user_id: UserId,
    movie_id: MovieId,
) -> AppResult<Option<Rating>> {
    let rating = sqlx::query_as::<_, Rating>(
        "SELECT user_id, movie_id, rating, date FROM ratings WHERE user_id = ? AND movie_id = ?",
    )
    .bind(user_id)
    .bind(movie_id)
    .fetch_optional(pool)
    .await?;

    Ok(rating)
}

/// All favorites of a user, oldest first
pub async fn list_favorites(pool: &SqlitePool, user_id: UserId) -> AppResult<Vec<Favorite>> {
    let favorites = sqlx::query_as::<_, Favorite>(
        "SELECT user_id, movie_id, date_added FROM favorites \
         WHERE user_id = ? ORDER BY date_added, movie_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(favorites)
}
