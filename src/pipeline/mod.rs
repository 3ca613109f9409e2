// Response pipeline
//
// Every gated operation runs the same sequence, each step short-circuiting
// the rest: reject insecure transport, derive permissions from registered
// metadata, pass the authorization gate, run the data closure once, map its
// status, transform the payload, then attach endpoint descriptors unless the
// caller opted out.

pub mod data;
pub mod error;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::auth::{AccessDecision, AuthorizationGate};
use crate::middleware::{RequestContext, ResponseEnvelope};
use crate::routes::{EndpointDescriptor, HandlerMetadata, RouteRegistry};
use crate::types::PermissionLevel;

pub use data::{DataResult, DataStatus};
pub use error::PipelineError;

/// Query key used when neither the handler nor the configuration names one
pub const DEFAULT_INCLUDE_ENDPOINTS_KEY: &str = "includeEndpoints";

pub struct ResponsePipeline {
    gate: AuthorizationGate,
    registry: Arc<RouteRegistry>,
    include_endpoints_key: String,
}

impl ResponsePipeline {
    pub fn new(gate: AuthorizationGate, registry: Arc<RouteRegistry>) -> Self {
        Self {
            gate,
            registry,
            include_endpoints_key: DEFAULT_INCLUDE_ENDPOINTS_KEY.to_string(),
        }
    }

    pub fn with_include_endpoints_key(mut self, key: impl Into<String>) -> Self {
        self.include_endpoints_key = key.into();
        self
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Run a payload-returning operation
    ///
    /// A payload that is not a `T` yields an envelope without content rather
    /// than an error.
    pub async fn execute<T, U, F, Fut, X>(
        &self,
        ctx: &RequestContext,
        handler: &str,
        operation: &str,
        data: F,
        transform: X,
    ) -> Result<ResponseEnvelope<U>, PipelineError>
    where
        T: 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<DataResult>>,
        X: FnOnce(T) -> U,
    {
        self.run(ctx, handler, operation, data, Some(transform)).await
    }

    /// Run an operation whose only visible output is the endpoint listing
    pub async fn execute_empty<F, Fut>(
        &self,
        ctx: &RequestContext,
        handler: &str,
        operation: &str,
        data: F,
    ) -> Result<ResponseEnvelope<()>, PipelineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<DataResult>>,
    {
        let envelope = self
            .run::<(), (), _, _, fn(())>(ctx, handler, operation, data, None)
            .await?;
        Ok(envelope.without_content())
    }

    /// Endpoint listing for a handler and its related handlers, without gating
    pub fn list_routes(
        &self,
        ctx: &RequestContext,
        handler: &str,
    ) -> Result<ResponseEnvelope<()>, PipelineError> {
        Ok(ResponseEnvelope::routes(self.discover(ctx, handler)?))
    }

    async fn run<T, U, F, Fut, X>(
        &self,
        ctx: &RequestContext,
        handler: &str,
        operation: &str,
        data: F,
        transform: Option<X>,
    ) -> Result<ResponseEnvelope<U>, PipelineError>
    where
        T: 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<DataResult>>,
        X: FnOnce(T) -> U,
    {
        if !self.gate.admits(&ctx.scheme, ctx.client_key.as_deref()) {
            return Err(PipelineError::Forbidden);
        }

        let (metadata, required) = self.required_permissions(handler, operation)?;

        match self
            .gate
            .check(&ctx.scheme, ctx.client_key.as_deref(), &required)
            .await
        {
            Ok(AccessDecision::Allow) => {}
            Ok(AccessDecision::Forbidden) => return Err(PipelineError::Forbidden),
            Ok(AccessDecision::Unauthorized) => return Err(PipelineError::Unauthorized),
            // Logged by the gate
            Err(_) => return Err(PipelineError::Internal),
        }

        let result = match AssertUnwindSafe(async move { data().await })
            .catch_unwind()
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::error!(
                    "Error occurred while creating an api response for {}.{}: {:#}",
                    handler,
                    operation,
                    e
                );
                return Err(PipelineError::Internal);
            }
            Err(_) => {
                tracing::error!(
                    "Data source panicked while creating an api response for {}.{}",
                    handler,
                    operation
                );
                return Err(PipelineError::Internal);
            }
        };

        match result.status {
            DataStatus::Success => {}
            DataStatus::Invalid => return Err(PipelineError::BadRequest),
            DataStatus::Error => return Err(PipelineError::Internal),
            DataStatus::Unrecognized(code) => {
                tracing::debug!(
                    "{}.{} returned unrecognized status {}",
                    handler,
                    operation,
                    code
                );
                return Err(PipelineError::NotImplemented);
            }
        }

        let content = match (result.into_value::<T>(), transform) {
            (Some(value), Some(transform)) => {
                match std::panic::catch_unwind(AssertUnwindSafe(move || transform(value))) {
                    Ok(content) => Some(content),
                    Err(_) => {
                        tracing::error!(
                            "Transform panicked while creating an api response for {}.{}",
                            handler,
                            operation
                        );
                        return Err(PipelineError::Internal);
                    }
                }
            }
            _ => None,
        };

        let mut envelope = ResponseEnvelope::new(content);
        if ctx.include_endpoints(self.toggle_key(&metadata)) {
            envelope.endpoint_items = self.discover(ctx, handler)?;
        }

        Ok(envelope)
    }

    fn required_permissions(
        &self,
        handler: &str,
        operation: &str,
    ) -> Result<(Arc<HandlerMetadata>, Vec<PermissionLevel>), PipelineError> {
        let metadata = self.registry.handler(handler).map_err(|e| {
            tracing::error!("Cannot resolve metadata for {}.{}: {}", handler, operation, e);
            PipelineError::Internal
        })?;

        let required = match metadata.operation(operation) {
            Some(op) => op.required_permissions(),
            None => {
                tracing::error!(
                    "Operation '{}' is not registered on handler '{}'",
                    operation,
                    handler
                );
                return Err(PipelineError::Internal);
            }
        };

        Ok((metadata, required))
    }

    fn toggle_key<'a>(&'a self, metadata: &'a HandlerMetadata) -> &'a str {
        metadata
            .include_endpoints_key
            .as_deref()
            .unwrap_or(&self.include_endpoints_key)
    }

    fn discover(
        &self,
        ctx: &RequestContext,
        handler: &str,
    ) -> Result<Vec<EndpointDescriptor>, PipelineError> {
        self.registry
            .discover(handler, &ctx.authority, false)
            .map_err(|e| {
                tracing::error!(
                    "Exception while getting related routing information for '{}': {}",
                    handler,
                    e
                );
                PipelineError::Internal
            })
    }
}
