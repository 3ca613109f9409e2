pub mod item_service;

pub use item_service::{Item, ItemModel, ItemService, ItemStats};
