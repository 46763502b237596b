//! Item-item collaborative filtering: pivot interactions into a dense table,
//! derive cosine similarity between items, and rank unseen items per user.

pub mod matrix;
pub mod ranking;
pub mod similarity;

pub use matrix::{IndexMap, InteractionTable};
pub use ranking::{rank_items, Ranking};
pub use similarity::ItemSimilarity;

/// Scores strictly above this count as positive engagement.
pub const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.1;
