pub mod seed;

use crate::models::*;
use crate::utils::validation::{validate_dataset, validate_interaction, validate_item};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub trait InteractionSource: Send + Sync {
    fn interactions(&self) -> Result<Vec<Interaction>>;
}

pub trait ItemCatalog: Send + Sync {
    /// Up to `limit` item ids, newest first.
    fn recent_items(&self, limit: usize) -> Result<Vec<ItemId>>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<BTreeMap<ItemId, ItemRecord>>,
    interactions: RwLock<BTreeMap<(UserId, ItemId), Interaction>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: Dataset) -> Result<Self> {
        validate_dataset(&dataset)?;

        let store = Self::new();
        {
            let mut items = store.items.write();
            for item in dataset.items {
                items.insert(item.item_id, item);
            }
        }
        {
            let mut interactions = store.interactions.write();
            for interaction in dataset.interactions {
                interactions.insert((interaction.user_id, interaction.item_id), interaction);
            }
        }

        info!(
            "Loaded dataset with {} items and {} interactions",
            store.item_count(),
            store.interaction_count()
        );
        Ok(store)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let dataset: Dataset = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
        Self::from_dataset(dataset)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.dataset())?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write dataset {}", path.display()))?;
        Ok(())
    }

    pub fn dataset(&self) -> Dataset {
        Dataset {
            items: self.items.read().values().cloned().collect(),
            interactions: self.interactions.read().values().copied().collect(),
        }
    }

    pub fn add_item(&self, item: ItemRecord) -> Result<()> {
        validate_item(&item)?;
        self.items.write().insert(item.item_id, item);
        Ok(())
    }

    pub fn record_interaction(&self, interaction: Interaction) -> Result<()> {
        validate_interaction(&interaction)?;
        self.interactions
            .write()
            .insert((interaction.user_id, interaction.item_id), interaction);
        Ok(())
    }

    pub fn record_engagement(
        &self,
        user_id: UserId,
        item_id: ItemId,
        signals: &EngagementSignals,
    ) -> Result<()> {
        self.record_interaction(Interaction::from_engagement(user_id, item_id, signals))
    }

    pub fn item_count(&self) -> usize {
        self.items.read().len()
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.read().len()
    }
}

impl InteractionSource for InMemoryStore {
    fn interactions(&self) -> Result<Vec<Interaction>> {
        Ok(self.interactions.read().values().copied().collect())
    }
}

impl ItemCatalog for InMemoryStore {
    fn recent_items(&self, limit: usize) -> Result<Vec<ItemId>> {
        let items = self.items.read();
        let mut records: Vec<&ItemRecord> = items.values().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.item_id.cmp(&a.item_id))
        });

        Ok(records.into_iter().take(limit).map(|item| item.item_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_recent_items_newest_first() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.add_item(ItemRecord::new(1, "old", now - Duration::days(3))).unwrap();
        store.add_item(ItemRecord::new(2, "new", now)).unwrap();
        store.add_item(ItemRecord::new(3, "mid", now - Duration::days(1))).unwrap();
        store.add_item(ItemRecord::new(4, "tie", now - Duration::days(1))).unwrap();

        assert_eq!(store.recent_items(10).unwrap(), vec![2, 4, 3, 1]);
        assert_eq!(store.recent_items(2).unwrap(), vec![2, 4]);
        assert!(store.recent_items(0).unwrap().is_empty());
    }

    #[test]
    fn test_record_interaction_upserts_pair() {
        let store = InMemoryStore::new();
        store.record_interaction(Interaction::new(1, 1, 2.0)).unwrap();
        store.record_interaction(Interaction::new(1, 1, 5.0)).unwrap();
        store
            .record_engagement(1, 2, &EngagementSignals::new(90).with_like(true))
            .unwrap();

        assert_eq!(store.interaction_count(), 2);
        assert_eq!(
            store.interactions().unwrap(),
            vec![Interaction::new(1, 1, 5.0), Interaction::new(1, 2, 4.0)]
        );
        assert!(store.record_interaction(Interaction::new(1, 3, f64::NAN)).is_err());
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let store = InMemoryStore::new();
        store.add_item(ItemRecord::new(7, "clip", Utc::now())).unwrap();
        store.record_interaction(Interaction::new(3, 7, 1.5)).unwrap();

        let path = std::env::temp_dir().join(format!("engagerec-store-{}.json", std::process::id()));
        store.save_json(&path).unwrap();
        let loaded = InMemoryStore::load_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.item_count(), 1);
        assert_eq!(loaded.interactions().unwrap(), vec![Interaction::new(3, 7, 1.5)]);
    }

    #[test]
    fn test_from_dataset_rejects_invalid_data() {
        let dataset = Dataset {
            items: vec![],
            interactions: vec![Interaction::new(1, 1, 1.0)],
        };
        assert!(InMemoryStore::from_dataset(dataset).is_err());
    }
}
