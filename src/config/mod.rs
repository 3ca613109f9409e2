use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

use crate::pipeline::DEFAULT_INCLUDE_ENDPOINTS_KEY;
use crate::types::PermissionLevel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub routes: RoutesConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Query key that lets clients opt out of endpoint listings
    pub include_endpoints_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Believe X-Forwarded-Proto from the fronting proxy
    pub trust_forwarded_proto: bool,
    pub client_keys: HashMap<String, PermissionLevel>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("REST_EASY_BIND") {
            self.server.bind = v;
        }
        if let Some(port) = env::var("REST_EASY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.server.port = port;
        }

        // Routes overrides
        if let Ok(v) = env::var("ROUTES_INCLUDE_ENDPOINTS_KEY") {
            if !v.trim().is_empty() {
                self.routes.include_endpoints_key = v.trim().to_string();
            }
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_TRUST_FORWARDED_PROTO") {
            self.security.trust_forwarded_proto =
                v.parse().unwrap_or(self.security.trust_forwarded_proto);
        }
        if let Ok(v) = env::var("SECURITY_CLIENT_KEYS") {
            self.security.client_keys = parse_client_keys(&v);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind: "127.0.0.1".to_string(),
                port: 3000,
            },
            routes: RoutesConfig {
                include_endpoints_key: DEFAULT_INCLUDE_ENDPOINTS_KEY.to_string(),
            },
            security: SecurityConfig {
                trust_forwarded_proto: true,
                client_keys: HashMap::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 3000,
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 8080,
            },
            ..Self::development()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

/// Parse `key=LEVEL,key=LEVEL`; malformed entries are skipped with a warning
pub fn parse_client_keys(raw: &str) -> HashMap<String, PermissionLevel> {
    let mut keys = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let parsed = entry
            .split_once('=')
            .map(|(key, level)| (key.trim(), level.parse::<PermissionLevel>()));

        match parsed {
            Some((key, Ok(level))) if !key.is_empty() => {
                keys.insert(key.to_string(), level);
            }
            Some((_, Err(e))) => tracing::warn!("Ignoring client key entry: {}", e),
            _ => tracing::warn!("Ignoring malformed client key entry"),
        }
    }

    keys
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
