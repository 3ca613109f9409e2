use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{AuthorizationGate, AuthorizationService};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::{self, admin, items};
use crate::pipeline::ResponsePipeline;
use crate::routes::DiscoveryError;
use crate::services::ItemService;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<ResponsePipeline>,
    pub items: ItemService,
}

impl AppState {
    /// Wire the pipeline from explicit collaborators; nothing is looked up globally
    pub fn new(
        config: AppConfig,
        authorizer: Arc<dyn AuthorizationService>,
    ) -> Result<Self, DiscoveryError> {
        let registry = Arc::new(handlers::catalog()?);
        let pipeline = ResponsePipeline::new(AuthorizationGate::new(authorizer), registry)
            .with_include_endpoints_key(config.routes.include_endpoints_key.clone());

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            items: ItemService::new(),
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/health", get(items::health))
        // Items
        .route("/api", get(items::paths))
        .route("/api/items", get(items::list).post(items::create))
        .route("/api/items/:id", get(items::get).delete(items::delete))
        // Admin
        .route("/admin", get(admin::paths))
        .route("/admin/stats", get(admin::stats))
        .fallback(not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("No such endpoint")
}
