use crate::models::*;
use anyhow::{Result, anyhow};
use std::collections::HashSet;

pub fn validate_interaction(interaction: &Interaction) -> Result<()> {
    if !interaction.score.is_finite() {
        return Err(anyhow!(
            "Interaction score for user {} item {} must be finite",
            interaction.user_id,
            interaction.item_id
        ));
    }

    Ok(())
}

pub fn validate_item(item: &ItemRecord) -> Result<()> {
    if item.title.len() > 200 {
        return Err(anyhow!("Item {} title too long (max 200 characters)", item.item_id));
    }

    Ok(())
}

pub fn validate_dataset(dataset: &Dataset) -> Result<()> {
    let mut item_ids = HashSet::with_capacity(dataset.items.len());

    for item in &dataset.items {
        validate_item(item)?;
        if !item_ids.insert(item.item_id) {
            return Err(anyhow!("Duplicate item id {}", item.item_id));
        }
    }

    for interaction in &dataset.interactions {
        validate_interaction(interaction)?;
        if !item_ids.contains(&interaction.item_id) {
            return Err(anyhow!(
                "Interaction of user {} refers to unknown item {}",
                interaction.user_id,
                interaction.item_id
            ));
        }
    }

    Ok(())
}
