use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Catalog, MovieId};

/// Smallest batch a caller can request
pub const MIN_WANT: usize = 6;
/// Largest batch a caller can request
pub const MAX_WANT: usize = 12;

/// Result of a candidate draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Previously shown ids in their original order, followed by the new
    /// draws
    pub drawn: Vec<MovieId>,
    /// Set when the emotion's remaining pool could not cover the deficit
    pub exhausted: bool,
}

/// Draws an emotion-filtered candidate batch for a session
///
/// The candidate universe is every catalog movie tagged with `emotion`.
/// Ids in `already_shown` are never re-drawn and keep their position at the
/// front of the result; new draws are sampled uniformly without replacement
/// from the remainder. When the remainder is smaller than the deficit, the
/// draw returns everything left and flags `exhausted` instead of failing.
///
/// `want` is clamped into `[MIN_WANT, MAX_WANT]` rather than rejected.
pub fn select_candidates(
    catalog: &Catalog,
    emotion: &str,
    already_shown: &[MovieId],
    want: usize,
    rng: &mut impl Rng,
) -> Selection {
    let want = want.clamp(MIN_WANT, MAX_WANT);

    let mut drawn: Vec<MovieId> = already_shown.to_vec();
    if want <= drawn.len() {
        return Selection {
            drawn,
            exhausted: false,
        };
    }
    let deficit = want - drawn.len();

    let shown: HashSet<MovieId> = drawn.iter().copied().collect();
    let mut pool: Vec<MovieId> = catalog
        .movies_for_emotion(emotion)
        .into_iter()
        .filter(|id| !shown.contains(id))
        .collect();

    let exhausted = pool.len() < deficit;
    let take = deficit.min(pool.len());

    let (picked, _) = pool.partial_shuffle(rng, take);
    drawn.extend_from_slice(picked);

    tracing::debug!(
        emotion,
        requested = want,
        drawn = drawn.len(),
        exhausted,
        "Candidate draw complete"
    );

    Selection { drawn, exhausted }
}
