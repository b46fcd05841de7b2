use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stable integer key of a user row
pub type UserId = i64;

/// A registered user
///
/// Created on first login and immutable afterwards; the credential stays in
/// the store and is never carried around in this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
}
