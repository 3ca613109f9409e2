use std::collections::HashMap;

use async_trait::async_trait;

use crate::auth::{AuthorizationError, AuthorizationService};
use crate::types::PermissionLevel;

/// Authorization backed by a fixed table of client keys
///
/// A key is granted a single level and passes when every required level is
/// at or below it.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyAuthorizer {
    grants: HashMap<String, PermissionLevel>,
}

impl StaticKeyAuthorizer {
    pub fn new(grants: HashMap<String, PermissionLevel>) -> Self {
        Self { grants }
    }

    pub fn with_key(mut self, key: impl Into<String>, level: PermissionLevel) -> Self {
        self.grants.insert(key.into(), level);
        self
    }

    pub fn granted(&self, client_key: &str) -> Option<PermissionLevel> {
        self.grants.get(client_key.trim()).copied()
    }
}

#[async_trait]
impl AuthorizationService for StaticKeyAuthorizer {
    async fn authorize(
        &self,
        client_key: Option<&str>,
        required: &[PermissionLevel],
    ) -> Result<bool, AuthorizationError> {
        let Some(granted) = client_key.and_then(|key| self.granted(key)) else {
            return Ok(false);
        };

        Ok(required.iter().all(|level| *level <= granted))
    }
}
