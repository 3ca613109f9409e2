use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::pipeline::DataResult;

/// Stored item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating an item (advertised as `ItemModel`)
#[derive(Debug, Clone, Deserialize)]
pub struct ItemModel {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemStats {
    pub count: usize,
    pub total_quantity: u64,
}

/// In-memory item store; insertion order is listing order
#[derive(Debug, Clone, Default)]
pub struct ItemService {
    items: Arc<RwLock<Vec<Item>>>,
}

impl ItemService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> anyhow::Result<DataResult> {
        Ok(DataResult::success(self.items.read().await.clone()))
    }

    /// Unknown or malformed ids are reported as invalid input
    pub async fn get(&self, id: &str) -> anyhow::Result<DataResult> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(DataResult::invalid());
        };

        let items = self.items.read().await;
        Ok(match items.iter().find(|item| item.id == id) {
            Some(item) => DataResult::success(item.clone()),
            None => DataResult::invalid(),
        })
    }

    pub async fn create(&self, body: Value) -> anyhow::Result<DataResult> {
        let model: ItemModel = match serde_json::from_value(body) {
            Ok(model) => model,
            Err(e) => {
                tracing::debug!("Rejected item body: {}", e);
                return Ok(DataResult::invalid());
            }
        };

        if model.name.trim().is_empty() {
            return Ok(DataResult::invalid());
        }

        let item = Item {
            id: Uuid::new_v4(),
            name: model.name.trim().to_string(),
            quantity: model.quantity,
            created_at: Utc::now(),
        };

        self.items.write().await.push(item.clone());
        tracing::info!("Created item {} ({})", item.id, item.name);
        Ok(DataResult::success(item))
    }

    pub async fn delete(&self, id: &str) -> anyhow::Result<DataResult> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(DataResult::invalid());
        };

        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);

        Ok(if items.len() < before {
            tracing::info!("Deleted item {}", id);
            DataResult::success_empty()
        } else {
            DataResult::invalid()
        })
    }

    pub async fn stats(&self) -> anyhow::Result<DataResult> {
        let items = self.items.read().await;
        Ok(DataResult::success(ItemStats {
            count: items.len(),
            total_quantity: items.iter().map(|item| u64::from(item.quantity)).sum(),
        }))
    }
}
