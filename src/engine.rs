use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::thread_rng;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{
    Catalog, Favorite, FavoriteOutcome, Movie, MovieId, Rating, Recommendation,
    RecommendationPage, User, UserId,
};
use crate::services::oracle::{FavoriteFeatures, FavoriteOracle, RatingOracle};
use crate::services::{favorites, ranking, recorder, selector, users};
use crate::session::SessionState;

/// Opaque key identifying one browsing session
pub type SessionKey = Uuid;

/// The recommendation engine facade
///
/// Owns the store pool, the immutable catalog, the oracle handles and a
/// registry of live session states keyed by session key. Presentation
/// layers call its request/response methods; nothing here depends on how
/// the results are rendered.
#[derive(Clone)]
pub struct Engine {
    pool: SqlitePool,
    catalog: Arc<Catalog>,
    rating_oracle: Arc<dyn RatingOracle>,
    favorite_oracle: Option<Arc<dyn FavoriteOracle>>,
    oracle_timeout: Duration,
    sessions: Arc<RwLock<HashMap<SessionKey, SessionState>>>,
}

impl Engine {
    pub fn new(
        pool: SqlitePool,
        catalog: Arc<Catalog>,
        rating_oracle: Arc<dyn RatingOracle>,
        oracle_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            catalog,
            rating_oracle,
            favorite_oracle: None,
            oracle_timeout,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Attaches the optional favorite-likelihood oracle
    pub fn with_favorite_oracle(mut self, oracle: Arc<dyn FavoriteOracle>) -> Self {
        self.favorite_oracle = Some(oracle);
        self
    }

    /// The underlying store pool, for presentation layers that run their
    /// own read-only queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a fresh browsing session
    pub async fn open_session(&self) -> SessionKey {
        let key = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(key, SessionState::new());
        tracing::debug!(session = %key, "Session opened");
        key
    }

    /// Discards a session's state
    ///
    /// The shown-set is ephemeral, so closing an unknown key is harmless.
    pub async fn close_session(&self, key: SessionKey) {
        self.sessions.write().await.remove(&key);
    }

    /// Authenticates a user, creating the account on first login
    pub async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        users::get_or_create(&self.pool, username, password).await
    }

    /// Produces a page of ranked recommendations for an emotion
    ///
    /// Selecting a new emotion starts a fresh shown-set for the session.
    /// Newly surfaced movies are logged as `shown` before the page is
    /// returned; asking again with a larger `want` grows the page without
    /// reshuffling what the user has already seen.
    pub async fn recommend(
        &self,
        session_key: SessionKey,
        user_id: UserId,
        emotion: &str,
        want: usize,
    ) -> AppResult<RecommendationPage> {
        // Check the session state out of the registry so one user's store
        // writes never hold the lock against other sessions. Operations
        // within a session are sequential, so nobody else can race for it.
        let mut session = self
            .sessions
            .write()
            .await
            .remove(&session_key)
            .unwrap_or_default();
        session.select_emotion(emotion);

        let selection = {
            let mut rng = thread_rng();
            selector::select_candidates(&self.catalog, emotion, session.shown(), want, &mut rng)
        };

        let mut logged = Ok(());
        for &movie_id in &selection.drawn {
            if let Err(e) =
                recorder::record_shown(&self.pool, &mut session, user_id, movie_id, emotion).await
            {
                logged = Err(e);
                break;
            }
        }

        // The shown-set must survive even a failed draw: it only records
        // writes that actually happened.
        self.sessions.write().await.insert(session_key, session);
        logged?;

        let ranked = ranking::rank(
            Arc::clone(&self.rating_oracle),
            &self.catalog,
            user_id,
            &selection.drawn,
            self.oracle_timeout,
        )
        .await;

        let items = ranked
            .into_iter()
            .filter_map(|r| {
                self.catalog.get(r.movie_id).map(|movie| Recommendation {
                    movie: movie.clone(),
                    predicted_score: r.predicted_score,
                })
            })
            .collect();

        Ok(RecommendationPage {
            items,
            exhausted: selection.exhausted,
        })
    }

    /// Records that the user watched a movie
    ///
    /// Returns false when there was no `shown` row to promote.
    pub async fn watch(&self, user_id: UserId, movie_id: MovieId) -> AppResult<bool> {
        recorder::record_view(&self.pool, user_id, movie_id).await
    }

    /// Adds a movie to the user's favorites
    pub async fn favorite(&self, user_id: UserId, movie_id: MovieId) -> AppResult<FavoriteOutcome> {
        favorites::add_favorite(&self.pool, user_id, movie_id).await
    }

    /// Removes a movie (and any rating of it) from the user's favorites
    pub async fn unfavorite(&self, user_id: UserId, movie_id: MovieId) -> AppResult<()> {
        favorites::remove_favorite(&self.pool, user_id, movie_id).await
    }

    /// Saves the user's 1-10 rating of a favorited movie
    pub async fn rate(&self, user_id: UserId, movie_id: MovieId, rating: i64) -> AppResult<()> {
        favorites::upsert_rating(&self.pool, user_id, movie_id, rating).await
    }

    /// The user's current rating of a movie, if any
    pub async fn rating(&self, user_id: UserId, movie_id: MovieId) -> AppResult<Option<Rating>> {
        favorites::get_rating(&self.pool, user_id, movie_id).await
    }

    /// The user's favorite movies, resolved against the catalog
    ///
    /// Favorites pointing at ids the current catalog no longer carries are
    /// skipped with a warning.
    pub async fn favorites_of(&self, user_id: UserId) -> AppResult<Vec<Movie>> {
        let rows: Vec<Favorite> = favorites::list_favorites(&self.pool, user_id).await?;

        let movies = rows
            .into_iter()
            .filter_map(|fav| match self.catalog.get(fav.movie_id) {
                Some(movie) => Some(movie.clone()),
                None => {
                    tracing::warn!(
                        user_id,
                        movie_id = fav.movie_id,
                        "Favorited movie missing from catalog"
                    );
                    None
                }
            })
            .collect();

        Ok(movies)
    }

    /// Advisory guess whether the user would favorite this movie
    ///
    /// Display-only. Returns `None` when no classifier is configured, the
    /// movie is unknown, or the oracle cannot answer; none of those cases
    /// may influence a write.
    pub async fn favorite_hint(&self, user_id: UserId, movie_id: MovieId) -> Option<bool> {
        let oracle = self.favorite_oracle.as_ref()?;
        let movie = self.catalog.get(movie_id)?;

        let rating = match favorites::get_rating(&self.pool, user_id, movie_id).await {
            Ok(rating) => rating.map(|r| r.rating as f64).unwrap_or(0.0),
            Err(e) => {
                tracing::warn!(user_id, movie_id, error = %e, "Rating lookup failed for hint");
                0.0
            }
        };

        let features = FavoriteFeatures {
            duration: movie.duration as f64,
            rating,
        };

        match oracle.predict_favorite(&features).await {
            Ok(hint) => Some(hint),
            Err(e) => {
                tracing::warn!(user_id, movie_id, error = %e, "Favorite hint unavailable");
                None
            }
        }
    }
}
