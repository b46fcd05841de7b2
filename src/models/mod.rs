pub mod catalog;
pub mod interaction;
pub mod movie;
pub mod recommendation;
pub mod user;

pub use catalog::Catalog;
pub use interaction::{Favorite, FavoriteOutcome, Interaction, InteractionType, Rating};
pub use movie::{Movie, MovieId};
pub use recommendation::{RankedMovie, Recommendation, RecommendationPage};
pub use user::{User, UserId};
