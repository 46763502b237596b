use crate::error::{RecommendError, Result};
use crate::models::{Interaction, ItemId, UserId};
use ndarray::{Array2, ArrayView1};
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Bidirectional mapping between domain ids and table positions.
///
/// Positions are only meaningful for the table they were built with and must
/// not outlive it.
#[derive(Debug, Clone)]
pub struct IndexMap<K> {
    ids: Vec<K>,
    positions: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash> IndexMap<K> {
    fn from_ids(ids: Vec<K>) -> Self {
        let positions = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self { ids, positions }
    }

    pub fn position(&self, id: &K) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn id(&self, position: usize) -> Option<K> {
        self.ids.get(position).copied()
    }

    pub fn ids(&self) -> &[K] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct InteractionTable {
    scores: Array2<f64>,
    users: IndexMap<UserId>,
    items: IndexMap<ItemId>,
}

impl InteractionTable {
    /// `Ok(None)` when no score is non-zero. For a repeated pair the last value wins.
    pub fn from_interactions(interactions: &[Interaction]) -> Result<Option<Self>> {
        let qualifying: Vec<&Interaction> = interactions.iter().filter(|i| i.has_signal()).collect();

        if qualifying.is_empty() {
            return Ok(None);
        }

        let user_ids: BTreeSet<UserId> = qualifying.iter().map(|i| i.user_id).collect();
        let item_ids: BTreeSet<ItemId> = qualifying.iter().map(|i| i.item_id).collect();

        if let Some(bad) = qualifying.iter().find(|i| !i.score.is_finite()) {
            return Err(RecommendError::MalformedScore {
                user_id: bad.user_id,
                item_id: bad.item_id,
                score: bad.score,
                rows: qualifying.len(),
                users: user_ids.len(),
                items: item_ids.len(),
            });
        }

        let users = IndexMap::from_ids(user_ids.into_iter().collect());
        let items = IndexMap::from_ids(item_ids.into_iter().collect());

        let mut scores = Array2::<f64>::zeros((users.len(), items.len()));
        for interaction in qualifying {
            if let (Some(row), Some(col)) = (
                users.position(&interaction.user_id),
                items.position(&interaction.item_id),
            ) {
                scores[[row, col]] = interaction.score;
            }
        }

        Ok(Some(Self { scores, users, items }))
    }

    pub fn scores(&self) -> &Array2<f64> {
        &self.scores
    }

    pub fn users(&self) -> &IndexMap<UserId> {
        &self.users
    }

    pub fn items(&self) -> &IndexMap<ItemId> {
        &self.items
    }

    pub fn user_count(&self) -> usize {
        self.scores.nrows()
    }

    pub fn item_count(&self) -> usize {
        self.scores.ncols()
    }

    pub fn user_row(&self, row: usize) -> Option<ArrayView1<'_, f64>> {
        (row < self.user_count()).then(|| self.scores.row(row))
    }

    pub fn score(&self, user_id: UserId, item_id: ItemId) -> Option<f64> {
        let row = self.users.position(&user_id)?;
        let col = self.items.position(&item_id)?;
        Some(self.scores[[row, col]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_scores_never_reach_the_table() {
        let interactions = vec![
            Interaction::new(1, 1, 0.0),
            Interaction::new(1, 2, 5.0),
            Interaction::new(2, 3, 0.0),
        ];

        let table = InteractionTable::from_interactions(&interactions)
            .unwrap()
            .unwrap();

        assert_eq!(table.users().ids(), &[1]);
        assert_eq!(table.items().ids(), &[2]);
        assert_eq!(table.score(1, 2), Some(5.0));
        assert_eq!(table.score(1, 1), None);
        assert_eq!(table.users().position(&2), None);
    }

    #[test]
    fn test_only_zero_scores_builds_nothing() {
        let interactions = vec![Interaction::new(1, 1, 0.0)];
        assert!(InteractionTable::from_interactions(&interactions).unwrap().is_none());
        assert!(InteractionTable::from_interactions(&[]).unwrap().is_none());
    }

    #[test]
    fn test_positions_follow_sorted_ids() {
        let interactions = vec![
            Interaction::new(30, 300, 1.0),
            Interaction::new(10, 200, 2.0),
            Interaction::new(20, 100, -2.0),
        ];

        let table = InteractionTable::from_interactions(&interactions)
            .unwrap()
            .unwrap();

        assert_eq!(table.users().ids(), &[10, 20, 30]);
        assert_eq!(table.items().ids(), &[100, 200, 300]);
        assert_eq!(table.users().position(&20), Some(1));
        assert_eq!(table.items().id(2), Some(300));
        assert_eq!(table.scores()[[1, 0]], -2.0);
        assert_eq!(table.scores()[[0, 0]], 0.0);
        assert_eq!((table.user_count(), table.item_count()), (3, 3));
    }

    #[test]
    fn test_duplicate_pair_keeps_last_value() {
        let interactions = vec![Interaction::new(1, 1, 2.0), Interaction::new(1, 1, 4.0)];
        let table = InteractionTable::from_interactions(&interactions)
            .unwrap()
            .unwrap();
        assert_eq!(table.score(1, 1), Some(4.0));
    }

    #[test]
    fn test_non_finite_score_is_malformed() {
        let interactions = vec![
            Interaction::new(1, 1, 1.0),
            Interaction::new(1, 3, 2.0),
            Interaction::new(2, 7, f64::NAN),
            Interaction::new(3, 3, 0.0),
        ];
        let err = InteractionTable::from_interactions(&interactions).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::MalformedScore {
                user_id: 2,
                item_id: 7,
                rows: 3,
                users: 2,
                items: 3,
                ..
            }
        ));
        assert!(err.to_string().contains("3 interactions over 2 users x 3 items"));
    }

    #[test]
    fn test_user_row_bounds() {
        let interactions = vec![Interaction::new(1, 1, 1.0), Interaction::new(1, 2, 3.0)];
        let table = InteractionTable::from_interactions(&interactions)
            .unwrap()
            .unwrap();
        assert_eq!(table.user_row(0).unwrap().to_vec(), vec![1.0, 3.0]);
        assert!(table.user_row(1).is_none());
    }
}
