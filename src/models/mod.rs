use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

pub type UserId = i64;
pub type ItemId = i64;

/// One summary row per (user, item) pair. A score of exactly zero means
/// "no signal" and never reaches the interaction table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementSignals {
    pub watch_time_seconds: u32,
    /// `None` means the user neither liked nor disliked the item.
    pub liked: Option<bool>,
    pub shared: bool,
    pub completed_watch: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub item_id: ItemId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub items: Vec<ItemRecord>,
    pub interactions: Vec<Interaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub user_id: UserId,
    pub items: Vec<ItemId>,
    pub generated_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(user_id: UserId, item_id: ItemId, score: f64) -> Self {
        Self {
            user_id,
            item_id,
            score,
        }
    }

    pub fn from_engagement(user_id: UserId, item_id: ItemId, signals: &EngagementSignals) -> Self {
        Self::new(user_id, item_id, signals.interaction_score())
    }

    pub fn has_signal(&self) -> bool {
        self.score != 0.0
    }
}

impl EngagementSignals {
    pub fn new(watch_time_seconds: u32) -> Self {
        Self {
            watch_time_seconds,
            ..Self::default()
        }
    }

    pub fn with_like(mut self, liked: bool) -> Self {
        self.liked = Some(liked);
        self
    }

    pub fn with_share(mut self) -> Self {
        self.shared = true;
        self
    }

    pub fn with_completion(mut self) -> Self {
        self.completed_watch = true;
        self
    }

    pub fn interaction_score(&self) -> f64 {
        let mut score = 0.0;

        if self.watch_time_seconds > 60 {
            score += 1.0;
        }
        if self.watch_time_seconds > 300 {
            score += 1.0;
        }
        if self.completed_watch {
            score += 2.0;
        }
        match self.liked {
            Some(true) => score += 3.0,
            Some(false) => score -= 2.0,
            None => {}
        }
        if self.shared {
            score += 2.0;
        }

        score
    }
}

impl ItemRecord {
    pub fn new(item_id: ItemId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            item_id,
            title: title.into(),
            created_at,
        }
    }
}
