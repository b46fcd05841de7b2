use serde::{Deserialize, Serialize};

/// Stable integer key of a catalog entry
pub type MovieId = i64;

/// A movie from the read-only catalog
///
/// Catalog entries are supplied externally and never mutated by the engine.
/// `emotions` is the set of emotion tags the entry was labelled with; a
/// movie is a recommendation candidate for an emotion iff the tag appears
/// in this set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Stable catalog key
    pub movie_id: MovieId,
    /// Display title
    pub title: String,
    /// Release year
    pub year: i32,
    /// Runtime in minutes
    pub duration: u32,
    /// Aggregate rating carried over from the catalog source
    pub base_rating: f64,
    /// Emotion tags this movie matches
    pub emotions: Vec<String>,
    /// Poster URL, when the catalog source has one
    #[serde(default)]
    pub poster: Option<String>,
}

impl Movie {
    /// True when this movie carries the given emotion tag
    pub fn matches_emotion(&self, emotion: &str) -> bool {
        self.emotions.iter().any(|tag| tag == emotion)
    }
}
