// handlers/mod.rs - Demonstration handlers
//
// Each handler registers its operation metadata here at startup; the axum
// routes in server.rs point at the functions in the sub-modules. The two
// handlers name each other as related, so either listing shows both.

pub mod admin;
pub mod items;

use crate::routes::{DiscoveryError, RouteRegistry};

/// Registry holding every handler this service exposes
pub fn catalog() -> Result<RouteRegistry, DiscoveryError> {
    Ok(RouteRegistry::builder()
        .register(items::metadata())?
        .register(admin::metadata())?
        .build())
}
