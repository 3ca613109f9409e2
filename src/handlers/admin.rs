use axum::extract::State;
use serde_json::Value;

use crate::api::format::stats_to_api_value;
use crate::middleware::{ApiResult, RequestContext};
use crate::routes::{HandlerMetadata, OperationMetadata};
use crate::server::AppState;
use crate::services::ItemStats;

pub const HANDLER: &str = "admin";

pub fn metadata() -> HandlerMetadata {
    HandlerMetadata::builder(HANDLER)
        .route_prefix("admin")
        .operation(
            OperationMetadata::new("paths")
                .route("")
                .rest_info("GET", "Lists the administrative endpoints"),
        )
        .operation(
            OperationMetadata::new("stats")
                .route("stats")
                .rest_info("GET", "Item counts and totals")
                .requires_admin(),
        )
        .related(super::items::HANDLER)
        .build()
}

/// GET /admin
pub async fn paths(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<()> {
    Ok(state.pipeline.list_routes(&ctx, HANDLER)?)
}

/// GET /admin/stats
pub async fn stats(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Value> {
    let service = state.items.clone();
    let envelope = state
        .pipeline
        .execute(
            &ctx,
            HANDLER,
            "stats",
            move || async move { service.stats().await },
            |stats: ItemStats| stats_to_api_value(&stats),
        )
        .await?;

    Ok(envelope)
}
