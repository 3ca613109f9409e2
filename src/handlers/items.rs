use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::format::{item_to_api_value, items_to_api_values};
use crate::middleware::{ApiResult, RequestContext};
use crate::routes::{HandlerMetadata, OperationMetadata};
use crate::server::AppState;
use crate::services::Item;

pub const HANDLER: &str = "items";
pub const BASE_PATH: &str = "/api/items";

pub fn metadata() -> HandlerMetadata {
    HandlerMetadata::builder(HANDLER)
        .route_prefix("api")
        .operation(
            OperationMetadata::new("paths")
                .route("")
                .rest_info("GET", "Lists the endpoints of this API"),
        )
        .operation(
            OperationMetadata::new("list")
                .route("items")
                .rest_info("GET", "Lists all items")
                .requires_read(),
        )
        .operation(
            OperationMetadata::new("get")
                .route("items/{id}")
                .rest_info("GET", "Gets a single item")
                .requires_read(),
        )
        .operation(
            OperationMetadata::new("create")
                .route("items")
                .rest_info_with_model("POST", "Creates an item", "ItemModel")
                .requires_write(),
        )
        .operation(
            OperationMetadata::new("delete")
                .route("items/{id}")
                .rest_info("DELETE", "Deletes an item")
                .requires_write()
                .requires_admin(),
        )
        .operation(
            OperationMetadata::new("health")
                .route("~/health")
                .rest_info("GET", "Service liveness"),
        )
        .related(super::admin::HANDLER)
        .build()
}

/// GET /api - endpoint listing for items and related handlers
pub async fn paths(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<()> {
    Ok(state.pipeline.list_routes(&ctx, HANDLER)?)
}

/// GET /api/items
pub async fn list(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Vec<Value>> {
    let service = state.items.clone();
    let envelope = state
        .pipeline
        .execute(
            &ctx,
            HANDLER,
            "list",
            move || async move { service.list().await },
            |items: Vec<Item>| items_to_api_values(&items, BASE_PATH),
        )
        .await?;

    Ok(envelope)
}

/// GET /api/items/:id
pub async fn get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let service = state.items.clone();
    let envelope = state
        .pipeline
        .execute(
            &ctx,
            HANDLER,
            "get",
            move || async move { service.get(&id).await },
            |item: Item| item_to_api_value(&item, BASE_PATH),
        )
        .await?;

    Ok(envelope)
}

/// POST /api/items - body must match ItemModel
pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(body): Json<Value>,
) -> ApiResult<Value> {
    let service = state.items.clone();
    let envelope = state
        .pipeline
        .execute(
            &ctx,
            HANDLER,
            "create",
            move || async move { service.create(body).await },
            |item: Item| item_to_api_value(&item, BASE_PATH),
        )
        .await?;

    Ok(envelope)
}

/// DELETE /api/items/:id
pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let service = state.items.clone();
    let envelope = state
        .pipeline
        .execute_empty(&ctx, HANDLER, "delete", move || async move {
            service.delete(&id).await
        })
        .await?;

    Ok(envelope)
}

/// GET /health - ungated liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
