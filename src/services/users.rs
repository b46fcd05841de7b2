use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::User;

/// Looks a user up by username, creating the row on first login
///
/// The credential is opaque to the engine and compared byte-for-byte; a
/// mismatch on a returning user surfaces as `AppError::Auth`, distinct from
/// input validation so callers can branch on "wrong password" vs "bad
/// input". Concurrent first logins race on the username uniqueness
/// constraint; the loser sees a store error and retries.
pub async fn get_or_create(pool: &SqlitePool, username: &str, password: &str) -> AppResult<User> {
    if username.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "username and password must be non-empty".to_string(),
        ));
    }

    let existing: Option<(i64, String)> =
        sqlx::query_as("SELECT user_id, password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    match existing {
        Some((user_id, stored)) => {
            if stored == password {
                Ok(User {
                    user_id,
                    username: username.to_string(),
                })
            } else {
                Err(AppError::Auth("wrong password".to_string()))
            }
        }
        None => {
            let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
                .bind(username)
                .bind(password)
                .execute(pool)
                .await?;

            let user_id = result.last_insert_rowid();
            tracing::info!(user_id, username, "Created user on first login");

            Ok(User {
                user_id,
                username: username.to_string(),
            })
        }
    }
}
