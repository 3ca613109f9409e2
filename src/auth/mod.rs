pub mod gate;
pub mod static_keys;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::PermissionLevel;

pub use gate::{
    AccessDecision, AuthorizationGate, Scheme, CLIENT_KEY_LENGTH, CLIENT_KEY_PREVIEW_LENGTH,
};
pub use static_keys::StaticKeyAuthorizer;

/// Failures of the authorization service itself, as opposed to a denial
#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("Authorization backend unavailable: {0}")]
    Unavailable(String),

    #[error("Authorization failed: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Decides whether a client may perform an action
///
/// Implementations own the meaning of each level; the gate only forwards the
/// credential and every level the operation declared.
#[async_trait]
pub trait AuthorizationService: Send + Sync {
    async fn authorize(
        &self,
        client_key: Option<&str>,
        required: &[PermissionLevel],
    ) -> Result<bool, AuthorizationError>;

    async fn authorize_level(
        &self,
        client_key: Option<&str>,
        required: PermissionLevel,
    ) -> Result<bool, AuthorizationError> {
        self.authorize(client_key, &[required]).await
    }
}
