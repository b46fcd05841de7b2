/// HTTP prediction provider
///
/// Talks to the model-serving process over a small JSON API:
///
/// 1. Rating prediction: GET /predict?user_id=..&movie_id=.. → { "score": f }
/// 2. Favorite likelihood: POST /favorite with a feature vector → { "favorite": b }
///
/// Every call is bounded by the configured timeout, and predicted scores can
/// optionally be served from Redis to spare the model process repeat work.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieId, UserId},
    services::oracle::{FavoriteFeatures, FavoriteOracle, RatingOracle},
};

const PREDICTION_CACHE_TTL: u64 = 86_400; // 1 day

#[derive(Clone)]
pub struct HttpPredictionProvider {
    http_client: HttpClient,
    api_url: String,
    cache: Option<Cache>,
}

impl HttpPredictionProvider {
    /// Creates a provider with the given base URL and per-call timeout
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
            cache: None,
        })
    }

    /// Attaches a Redis cache for predicted scores
    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetches a predicted score from the model service
    async fn fetch_prediction(&self, user_id: UserId, movie_id: MovieId) -> AppResult<f64> {
        let url = format!("{}/predict", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("user_id", user_id.to_string()),
                ("movie_id", movie_id.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Oracle(format!(
                "Prediction service returned status {}: {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct PredictResponse {
            score: f64,
        }

        let parsed: PredictResponse = response.json().await?;
        Ok(parsed.score)
    }
}

#[async_trait::async_trait]
impl RatingOracle for HttpPredictionProvider {
    async fn predict(&self, user_id: UserId, movie_id: MovieId) -> AppResult<f64> {
        match &self.cache {
            Some(cache) => {
                let key = CacheKey::Prediction(user_id, movie_id);
                cached!(
                    cache,
                    key,
                    PREDICTION_CACHE_TTL,
                    self.fetch_prediction(user_id, movie_id)
                )
            }
            None => self.fetch_prediction(user_id, movie_id).await,
        }
    }

    fn name(&self) -> &'static str {
        "http-prediction"
    }
}

#[async_trait::async_trait]
impl FavoriteOracle for HttpPredictionProvider {
    async fn predict_favorite(&self, features: &FavoriteFeatures) -> AppResult<bool> {
        let url = format!("{}/favorite", self.api_url);

        let response = self.http_client.post(&url).json(features).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Oracle(format!(
                "Favorite classifier returned status {}",
                status
            )));
        }

        #[derive(Deserialize)]
        struct FavoriteResponse {
            favorite: bool,
        }

        let parsed: FavoriteResponse = response.json().await?;
        Ok(parsed.favorite)
    }
}
