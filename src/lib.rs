//! Emotion-driven movie recommendation engine.
//!
//! Picks non-repeating candidate batches from an emotion-filtered catalog,
//! ranks them with an external rating-prediction oracle, and keeps the
//! relational interaction store (shown/view logs, favorites, ratings)
//! consistent. This crate is a library: rendering, authentication UI and
//! model training live with its callers.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use config::Config;
pub use engine::{Engine, SessionKey};
pub use error::{AppError, AppResult};
pub use models::{
    Catalog, Favorite, FavoriteOutcome, Interaction, InteractionType, Movie, MovieId, Rating,
    RankedMovie, Recommendation, RecommendationPage, User, UserId,
};
pub use session::SessionState;

/// Initializes tracing for embedding applications
///
/// Respects `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
