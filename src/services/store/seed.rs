use crate::config::SeedConfig;
use crate::models::*;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOPICS: &[&str] = &[
    "Cat Compilation",
    "Python Crash Course",
    "PC Build Guide",
    "City Travel Vlog",
    "Pasta Masterclass",
    "Sci-Fi Short",
    "Investing Basics",
    "Home HIIT Workout",
    "Guitar Covers",
    "Deep Ocean Documentary",
];

pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn random_signals<R: Rng + ?Sized>(rng: &mut R) -> EngagementSignals {
    let liked = match rng.gen_range(0..5) {
        0 => Some(true),
        1 => Some(false),
        _ => None,
    };

    EngagementSignals {
        watch_time_seconds: rng.gen_range(10..=300),
        liked,
        shared: rng.gen_bool(0.2),
        completed_watch: rng.gen_bool(0.7),
    }
}

pub fn generate_dataset<R: Rng + ?Sized>(config: &SeedConfig, rng: &mut R) -> Dataset {
    let now = Utc::now();

    let items: Vec<ItemRecord> = (1..=config.items)
        .map(|n| {
            let age = Duration::days(rng.gen_range(1..=400)) + Duration::seconds(rng.gen_range(0..86_400));
            let topic = TOPICS[(n - 1) % TOPICS.len()];
            ItemRecord::new(n as ItemId, format!("{} #{}", topic, n), now - age)
        })
        .collect();

    let mut interactions = Vec::new();
    if !items.is_empty() {
        for user in 1..=config.users {
            let lower = items.len().min(5);
            let amount = rng.gen_range(lower..=items.len());
            for idx in rand::seq::index::sample(rng, items.len(), amount).iter() {
                let signals = random_signals(rng);
                interactions.push(Interaction::from_engagement(
                    user as UserId,
                    items[idx].item_id,
                    &signals,
                ));
            }
        }
    }

    Dataset { items, interactions }
}
