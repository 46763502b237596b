use crate::algorithms::matrix::InteractionTable;
use crate::algorithms::similarity::ItemSimilarity;
use crate::models::{ItemId, UserId};
use crate::utils::top_k_indices;

#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    Ranked(Vec<ItemId>),
    UnknownUser,
    /// Every score of the user is at or below the positive threshold.
    NoPositiveSignal,
    Inconsistent,
}

/// Item-item collaborative filtering for a single user.
///
/// Each item the user scored strictly above `positive_threshold` contributes
/// its similarity row, weighted by that score. Every item the user has any
/// non-zero score for is then excluded, including those too weak to count as
/// positive.
pub fn rank_items(
    table: &InteractionTable,
    similarity: &ItemSimilarity,
    user_id: UserId,
    count: usize,
    positive_threshold: f64,
) -> Ranking {
    let Some(row) = table.users().position(&user_id) else {
        return Ranking::UnknownUser;
    };
    let Some(interactions) = table.user_row(row) else {
        return Ranking::Inconsistent;
    };
    if similarity.dim() != table.item_count() || table.items().len() != table.item_count() {
        return Ranking::Inconsistent;
    }

    let positives: Vec<(usize, f64)> = interactions
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score > positive_threshold)
        .map(|(idx, &score)| (idx, score))
        .collect();

    if positives.is_empty() {
        return Ranking::NoPositiveSignal;
    }

    let mut aggregate = vec![0.0_f64; similarity.dim()];
    for (source, weight) in positives {
        for (target, value) in similarity.row(source) {
            aggregate[target] += value * weight;
        }
    }

    for (idx, &raw) in interactions.iter().enumerate() {
        if raw != 0.0 {
            aggregate[idx] = f64::NEG_INFINITY;
        }
    }

    let items = top_k_indices(&aggregate, count)
        .into_iter()
        .filter_map(|idx| table.items().id(idx))
        .collect();

    Ranking::Ranked(items)
}
