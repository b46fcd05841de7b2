use serde::{Deserialize, Serialize};

use super::movie::{Movie, MovieId};

/// A candidate annotated with its predicted affinity score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedMovie {
    pub movie_id: MovieId,
    pub predicted_score: f64,
}

/// A fully resolved recommendation for presentation layers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    pub predicted_score: f64,
}

/// One page of recommendations for a session
///
/// `exhausted` is set when the emotion's candidate pool could not cover the
/// requested count; callers should stop offering "show more" at that point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationPage {
    pub items: Vec<Recommendation>,
    pub exhausted: bool,
}
