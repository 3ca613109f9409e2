use serde_json::{json, Value};

use crate::services::item_service::{Item, ItemStats};

/// Convert an Item into the public wire format
/// { id, type, attributes, links }
pub fn item_to_api_value(item: &Item, base_path: &str) -> Value {
    json!({
        "id": item.id.to_string(),
        "type": "item",
        "attributes": {
            "name": item.name,
            "quantity": item.quantity,
            "created_at": item.created_at.to_rfc3339(),
        },
        "links": {
            "self": format!("{}/{}", base_path.trim_end_matches('/'), item.id)
        }
    })
}

/// Convert a list of items to API values
pub fn items_to_api_values(items: &[Item], base_path: &str) -> Vec<Value> {
    items
        .iter()
        .map(|item| item_to_api_value(item, base_path))
        .collect()
}

pub fn stats_to_api_value(stats: &ItemStats) -> Value {
    json!({
        "type": "stats",
        "attributes": {
            "count": stats.count,
            "total_quantity": stats.total_quantity,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_item_wire_format() {
        let item = Item {
            id: Uuid::nil(),
            name: "widget".into(),
            quantity: 2,
            created_at: Utc::now(),
        };

        let value = item_to_api_value(&item, "/api/items/");
        assert_eq!(value["type"], "item");
        assert_eq!(value["attributes"]["name"], "widget");
        assert_eq!(value["links"]["self"], format!("/api/items/{}", Uuid::nil()));
        assert_eq!(items_to_api_values(&[item], "/api/items").len(), 1);
    }
}
