use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};

use rest_easy::auth::StaticKeyAuthorizer;
use rest_easy::config::AppConfig;
use rest_easy::server::{app, AppState};
use rest_easy::PermissionLevel;

pub const READ_KEY: &str = "read0000000000000000000000000000";
pub const WRITE_KEY: &str = "write000000000000000000000000000";
pub const ADMIN_KEY: &str = "admin000000000000000000000000000";

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    /// Serve the router on an ephemeral port for the lifetime of the test runtime
    pub async fn spawn() -> Result<Self> {
        let authorizer = StaticKeyAuthorizer::default()
            .with_key(READ_KEY, PermissionLevel::Read)
            .with_key(WRITE_KEY, PermissionLevel::Write)
            .with_key(ADMIN_KEY, PermissionLevel::Admin);

        let state = AppState::new(AppConfig::default(), Arc::new(authorizer))?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind ephemeral port")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        Ok(Self {
            addr,
            base_url: format!("http://{}", addr),
            client: Client::new(),
        })
    }

    /// Request as if it arrived through a TLS-terminating proxy
    pub fn secure(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("x-forwarded-proto", "https")
    }

    pub fn insecure(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Authority the server reports for secure requests
    pub fn secure_authority(&self) -> String {
        format!("127.0.0.1:{}", self.addr.port())
    }
}
