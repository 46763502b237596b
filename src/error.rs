use crate::models::{ItemId, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("interaction data unavailable: {0}")]
    DataUnavailable(String),
    #[error(
        "malformed score {score} for user {user_id} item {item_id} \
         ({rows} interactions over {users} users x {items} items)"
    )]
    MalformedScore {
        user_id: UserId,
        item_id: ItemId,
        score: f64,
        rows: usize,
        users: usize,
        items: usize,
    },
    #[error("similarity computation failed for {items} items x {users} users: {reason}")]
    Similarity {
        items: usize,
        users: usize,
        reason: String,
    },
    #[error("similarity matrix is {rows}x{cols} but {items} items are indexed")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        items: usize,
    },
}

pub type Result<T> = std::result::Result<T, RecommendError>;

impl RecommendError {
    pub fn is_computation(&self) -> bool {
        !matches!(self, RecommendError::DataUnavailable(_))
    }
}
