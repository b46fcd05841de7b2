use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::movie::MovieId;
use super::user::UserId;

/// How far a user has gotten with a recommended movie
///
/// `Shown` rows are written when a movie surfaces in a recommendation page;
/// promotion rewrites the same row to `View` instead of inserting a second
/// one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InteractionType {
    Shown,
    View,
}

/// A logged recommendation interaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Interaction {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub emotion: String,
    pub interaction_type: InteractionType,
    pub date: DateTime<Utc>,
}

/// A favorites-list entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Favorite {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub date_added: DateTime<Utc>,
}

/// A user's rating of a favorited movie, on a 1-10 scale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: i64,
    pub date: DateTime<Utc>,
}

/// Result of an add-to-favorites request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteOutcome {
    /// A new favorite row was written
    Added,
    /// The pair was already favorited; nothing changed
    AlreadyFavorited,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_type_serialization() {
        assert_eq!(
            serde_json::to_string(&InteractionType::Shown).unwrap(),
            "\"shown\""
        );
        assert_eq!(
            serde_json::to_string(&InteractionType::View).unwrap(),
            "\"view\""
        );
    }

    #[test]
    fn test_favorite_outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&FavoriteOutcome::AlreadyFavorited).unwrap(),
            "\"already_favorited\""
        );
    }
}
