use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::movie::{Movie, MovieId};

/// The immutable movie catalog
///
/// Loaded once at startup and shared read-only for the process lifetime.
/// Entries keep their source order, which is what ranking falls back to for
/// tie-breaks, and duplicate ids are dropped on construction so the
/// candidate universe is already deduplicated.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    index: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Builds a catalog from externally supplied entries
    ///
    /// The first occurrence of an id wins; later duplicates are logged and
    /// skipped.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let mut deduped = Vec::with_capacity(movies.len());
        let mut index = HashMap::with_capacity(movies.len());

        for movie in movies {
            if index.contains_key(&movie.movie_id) {
                tracing::warn!(movie_id = movie.movie_id, "Duplicate catalog id skipped");
                continue;
            }
            index.insert(movie.movie_id, deduped.len());
            deduped.push(movie);
        }

        Self {
            movies: deduped,
            index,
        }
    }

    /// Loads a catalog from a JSON array of movies
    pub fn load_json(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file = File::open(path.as_ref())?;
        let movies: Vec<Movie> = serde_json::from_reader(BufReader::new(file))?;

        tracing::info!(entries = movies.len(), "Loaded movie catalog");

        Ok(Self::from_movies(movies))
    }

    /// Looks up a movie by id
    pub fn get(&self, movie_id: MovieId) -> Option<&Movie> {
        self.index.get(&movie_id).map(|&pos| &self.movies[pos])
    }

    /// Position of a movie in catalog order
    pub fn position(&self, movie_id: MovieId) -> Option<usize> {
        self.index.get(&movie_id).copied()
    }

    /// Ids of all movies tagged with the given emotion, in catalog order
    pub fn movies_for_emotion(&self, emotion: &str) -> Vec<MovieId> {
        self.movies
            .iter()
            .filter(|movie| movie.matches_emotion(emotion))
            .map(|movie| movie.movie_id)
            .collect()
    }

    /// Iterates over all entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, emotions: &[&str]) -> Movie {
        Movie {
            movie_id: id,
            title: format!("Movie {}", id),
            year: 2000,
            duration: 100,
            base_rating: 7.0,
            emotions: emotions.iter().map(|e| e.to_string()).collect(),
            poster: None,
        }
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let catalog = Catalog::from_movies(vec![
            movie(1, &["Happy"]),
            movie(2, &["Sad"]),
            movie(1, &["Scared"]),
        ]);

        assert_eq!(catalog.len(), 2);
        // First occurrence wins.
        assert!(catalog.get(1).unwrap().matches_emotion("Happy"));
    }

    #[test]
    fn test_emotion_filter_preserves_catalog_order() {
        let catalog = Catalog::from_movies(vec![
            movie(5, &["Happy"]),
            movie(3, &["Sad"]),
            movie(9, &["Happy", "Sad"]),
            movie(1, &["Happy"]),
        ]);

        assert_eq!(catalog.movies_for_emotion("Happy"), vec![5, 9, 1]);
        assert_eq!(catalog.movies_for_emotion("Sad"), vec![3, 9]);
        assert!(catalog.movies_for_emotion("Romantic").is_empty());
    }

    #[test]
    fn test_position_follows_source_order() {
        let catalog = Catalog::from_movies(vec![movie(42, &["Happy"]), movie(7, &["Sad"])]);

        assert_eq!(catalog.position(42), Some(0));
        assert_eq!(catalog.position(7), Some(1));
        assert_eq!(catalog.position(99), None);
    }
}
