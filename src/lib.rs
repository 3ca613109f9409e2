pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pipeline;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use auth::{AuthorizationGate, AuthorizationService, Scheme};
pub use error::ApiError;
pub use middleware::{RequestContext, ResponseEnvelope};
pub use pipeline::{DataResult, DataStatus, PipelineError, ResponsePipeline};
pub use routes::{EndpointDescriptor, HandlerMetadata, OperationMetadata, RouteRegistry};
pub use types::PermissionLevel;
