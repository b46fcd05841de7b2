use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Catalog, MovieId, RankedMovie, UserId};
use crate::services::oracle::RatingOracle;

/// Neutral score substituted when the oracle cannot answer for a movie
pub const DEFAULT_SCORE: f64 = 5.0;

/// Orders candidates by predicted affinity, best first
///
/// Predictions fan out as one task per movie so a slow oracle call only
/// costs its own timeout. A failed, timed-out or panicked prediction
/// degrades that movie to `DEFAULT_SCORE`; it never aborts the batch and
/// never drops the candidate. Ties are broken by catalog position, which
/// keeps the output deterministic for identical inputs.
pub async fn rank(
    oracle: Arc<dyn RatingOracle>,
    catalog: &Catalog,
    user_id: UserId,
    drawn: &[MovieId],
    oracle_timeout: Duration,
) -> Vec<RankedMovie> {
    let mut tasks = Vec::with_capacity(drawn.len());

    for &movie_id in drawn {
        let oracle = Arc::clone(&oracle);
        let task = tokio::spawn(async move {
            tokio::time::timeout(oracle_timeout, oracle.predict(user_id, movie_id)).await
        });
        tasks.push((movie_id, task));
    }

    let mut scored = Vec::with_capacity(drawn.len());

    for (movie_id, task) in tasks {
        let predicted_score = match task.await {
            Ok(Ok(Ok(score))) => score,
            Ok(Ok(Err(e))) => {
                tracing::warn!(
                    user_id,
                    movie_id,
                    error = %e,
                    "Prediction failed, substituting default score"
                );
                DEFAULT_SCORE
            }
            Ok(Err(_)) => {
                tracing::warn!(
                    user_id,
                    movie_id,
                    timeout_ms = oracle_timeout.as_millis() as u64,
                    "Prediction timed out, substituting default score"
                );
                DEFAULT_SCORE
            }
            Err(e) => {
                tracing::error!(user_id, movie_id, error = %e, "Prediction task failed");
                DEFAULT_SCORE
            }
        };

        let position = catalog.position(movie_id).unwrap_or(usize::MAX);
        scored.push((
            position,
            RankedMovie {
                movie_id,
                predicted_score,
            },
        ));
    }

    scored.sort_by(|a, b| {
        b.1.predicted_score
            .partial_cmp(&a.1.predicted_score)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    scored.into_iter().map(|(_, ranked)| ranked).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::models::Movie;
    use crate::services::oracle::MockRatingOracle;

    fn catalog_of(ids: &[MovieId]) -> Catalog {
        Catalog::from_movies(
            ids.iter()
                .map(|&id| Movie {
                    movie_id: id,
                    title: format!("Movie {}", id),
                    year: 2000,
                    duration: 100,
                    base_rating: 7.0,
                    emotions: vec!["Happy".to_string()],
                    poster: None,
                })
                .collect(),
        )
    }

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_orders_by_predicted_score_descending() {
        let catalog = catalog_of(&[7, 42, 3]);
        let mut oracle = MockRatingOracle::new();
        oracle.expect_predict().returning(|_, movie_id| match movie_id {
            7 => Ok(6.5),
            42 => Ok(9.1),
            3 => Ok(2.0),
            _ => unreachable!(),
        });

        let ranked = rank(Arc::new(oracle), &catalog, 1, &[7, 42, 3], TIMEOUT).await;

        let ids: Vec<MovieId> = ranked.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![42, 7, 3]);
    }

    #[tokio::test]
    async fn test_failed_prediction_degrades_to_default_only_for_that_movie() {
        let catalog = catalog_of(&[7, 42, 3]);
        let mut oracle = MockRatingOracle::new();
        oracle.expect_predict().returning(|_, movie_id| match movie_id {
            7 => Ok(8.0),
            42 => Err(AppError::Oracle("model unavailable".to_string())),
            3 => Ok(2.0),
            _ => unreachable!(),
        });

        let ranked = rank(Arc::new(oracle), &catalog, 1, &[7, 42, 3], TIMEOUT).await;

        assert_eq!(ranked.len(), 3);
        let ids: Vec<MovieId> = ranked.iter().map(|r| r.movie_id).collect();
        // Movie 42 lands on the default score, between the real 8.0 and 2.0.
        assert_eq!(ids, vec![7, 42, 3]);
        assert_eq!(ranked[1].predicted_score, DEFAULT_SCORE);
    }

    #[tokio::test]
    async fn test_ties_break_by_catalog_order() {
        let catalog = catalog_of(&[10, 20, 30]);
        let mut oracle = MockRatingOracle::new();
        oracle.expect_predict().returning(|_, _| Ok(5.0));

        // Draw order differs from catalog order on purpose.
        let ranked = rank(Arc::new(oracle), &catalog, 1, &[30, 10, 20], TIMEOUT).await;

        let ids: Vec<MovieId> = ranked.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    /// Answers instantly for movie 1 and stalls forever on movie 2.
    struct SlowOracle;

    #[async_trait::async_trait]
    impl RatingOracle for SlowOracle {
        async fn predict(&self, _user_id: UserId, movie_id: MovieId) -> AppResult<f64> {
            if movie_id == 2 {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(9.0)
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_prediction_times_out_to_default() {
        let catalog = catalog_of(&[1, 2]);

        let ranked = rank(
            Arc::new(SlowOracle),
            &catalog,
            1,
            &[1, 2],
            Duration::from_millis(100),
        )
        .await;

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].movie_id, 1);
        assert_eq!(ranked[0].predicted_score, 9.0);
        assert_eq!(ranked[1].movie_id, 2);
        assert_eq!(ranked[1].predicted_score, DEFAULT_SCORE);
    }

    #[tokio::test]
    async fn test_never_drops_candidates_even_when_all_fail() {
        let catalog = catalog_of(&[1, 2, 3]);
        let mut oracle = MockRatingOracle::new();
        oracle
            .expect_predict()
            .returning(|_, _| Err(AppError::Oracle("down".to_string())));

        let ranked = rank(Arc::new(oracle), &catalog, 1, &[1, 2, 3], TIMEOUT).await;

        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|r| r.predicted_score == DEFAULT_SCORE));
        // All tied on the default, so catalog order decides.
        let ids: Vec<MovieId> = ranked.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
