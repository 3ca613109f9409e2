// Endpoint discovery over registered handler metadata
//
// Handlers are registered once at startup and never mutated afterwards, so
// the registry is shared across requests behind an Arc without locking.
// Related handlers are expanded exactly one level deep: a related handler's
// own relations are never followed, which also keeps mutually related
// handlers from looping.

use std::collections::HashMap;
use std::sync::Arc;

use crate::routes::descriptor::EndpointDescriptor;
use crate::routes::error::DiscoveryError;
use crate::routes::metadata::{HandlerMetadata, OperationMetadata};

/// Leading marker that turns a prefix or route into a complete override path
pub const ABSOLUTE_MARKER: char = '~';

#[derive(Debug, Default)]
pub struct RouteRegistry {
    handlers: HashMap<String, Arc<HandlerMetadata>>,
}

#[derive(Debug, Default)]
pub struct RouteRegistryBuilder {
    handlers: HashMap<String, Arc<HandlerMetadata>>,
}

impl RouteRegistryBuilder {
    pub fn register(mut self, handler: HandlerMetadata) -> Result<Self, DiscoveryError> {
        if self.handlers.contains_key(&handler.name) {
            return Err(DiscoveryError::DuplicateHandler(handler.name));
        }

        tracing::debug!(
            "Registered handler '{}' with {} operations",
            handler.name,
            handler.operations.len()
        );
        self.handlers.insert(handler.name.clone(), Arc::new(handler));
        Ok(self)
    }

    pub fn build(self) -> RouteRegistry {
        RouteRegistry { handlers: self.handlers }
    }
}

impl RouteRegistry {
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    pub fn handler(&self, name: &str) -> Result<Arc<HandlerMetadata>, DiscoveryError> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| DiscoveryError::UnknownHandler(name.to_string()))
    }

    /// List the endpoints of `handler` followed by those of its related handlers
    ///
    /// Fails only when `handler` itself is not registered. A related handler
    /// that cannot be discovered is logged and left out of the listing.
    pub fn discover(
        &self,
        handler: &str,
        authority: &str,
        shallow: bool,
    ) -> Result<Vec<EndpointDescriptor>, DiscoveryError> {
        let metadata = self.handler(handler)?;
        let mut endpoints = describe_handler(&metadata, authority);

        if !shallow {
            for related in &metadata.related {
                match self.discover(related, authority, true) {
                    Ok(items) => endpoints.extend(items),
                    Err(e) => {
                        tracing::error!(
                            "There was an error while getting the endpoint information for the handler '{}' (related to '{}'): {}",
                            related,
                            metadata.name,
                            e
                        );
                    }
                }
            }
        }

        Ok(endpoints)
    }
}

/// Descriptors for the handler's own exposed operations, in declaration order
fn describe_handler(handler: &HandlerMetadata, authority: &str) -> Vec<EndpointDescriptor> {
    if handler.route_prefix.is_none() {
        tracing::warn!("The handler '{}' doesn't have a route prefix", handler.name);
    }

    handler
        .operations
        .iter()
        .filter(|op| op.exposed)
        .filter_map(|op| describe_operation(handler, op, authority))
        .collect()
}

fn describe_operation(
    handler: &HandlerMetadata,
    op: &OperationMetadata,
    authority: &str,
) -> Option<EndpointDescriptor> {
    let Some(route) = op.route.as_deref() else {
        tracing::warn!(
            "The operation '{}' of the handler '{}' doesn't have a route",
            op.name, handler.name
        );
        return None;
    };

    // Route metadata alone is not enough to be listed
    let info = op.rest_info.as_ref()?;

    let full_path = build_full_path(authority, handler.route_prefix.as_deref(), route);
    Some(EndpointDescriptor::new(
        info.http_method.clone(),
        full_path,
        info.description.clone(),
        info.model_name.clone(),
    ))
}

/// Join authority, prefix and route with exactly one `/` between segments
///
/// An absolute (`~`) prefix or route drops the authority and the prefix and
/// yields a rooted path built from the route alone.
pub fn build_full_path(authority: &str, prefix: Option<&str>, route: &str) -> String {
    let route_absolute = route.starts_with(ABSOLUTE_MARKER);
    let prefix_absolute = prefix.map_or(false, |p| p.starts_with(ABSOLUTE_MARKER));
    let route = normalize_segment(strip_marker(route));

    if route_absolute || prefix_absolute {
        return format!("/{}", route);
    }

    let prefix = prefix.map(|p| normalize_segment(strip_marker(p))).unwrap_or_default();

    [authority.trim_end_matches('/').to_string(), prefix, route]
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn strip_marker(value: &str) -> &str {
    value.strip_prefix(ABSOLUTE_MARKER).unwrap_or(value)
}

fn normalize_segment(value: &str) -> String {
    value
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
