/// Prediction oracle abstraction
///
/// The trained models behind recommendations are external collaborators:
/// the engine only ever talks to them through these traits. That keeps the
/// training pipeline fully out of the core and lets tests substitute mocks
/// for the real service.
use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppResult;
use crate::models::{MovieId, UserId};

pub mod http;

pub use http::HttpPredictionProvider;

/// Feature vector for the favorite-likelihood classifier
///
/// Matches what the classifier was trained on: runtime and the user's
/// current rating of the movie, with 0.0 standing in for "not rated".
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FavoriteFeatures {
    pub duration: f64,
    pub rating: f64,
}

/// Rating-prediction oracle
///
/// Returns the predicted affinity of a user for a movie on the 1-10 rating
/// scale. Callers must treat every failure as recoverable; the ranking
/// layer substitutes a neutral default instead of propagating.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingOracle: Send + Sync {
    async fn predict(&self, user_id: UserId, movie_id: MovieId) -> AppResult<f64>;

    /// Oracle name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Favorite-likelihood oracle
///
/// Purely advisory: the answer may decorate a recommendation but never
/// gates a write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteOracle: Send + Sync {
    async fn predict_favorite(&self, features: &FavoriteFeatures) -> AppResult<bool>;
}
