use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use url::Url;

use crate::auth::Scheme;
use crate::server::AppState;

/// Header set by TLS-terminating proxies
pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// Transport and client facts the pipeline needs about the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub scheme: Scheme,
    pub client_key: Option<String>,
    /// `host:port`, with the scheme's default port filled in
    pub authority: String,
    pub query: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(scheme: Scheme, authority: impl Into<String>) -> Self {
        Self {
            scheme,
            client_key: None,
            authority: authority.into(),
            query: HashMap::new(),
        }
    }

    pub fn with_client_key(mut self, key: impl Into<String>) -> Self {
        self.client_key = Some(key.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn from_parts(parts: &Parts, trust_forwarded_proto: bool) -> Self {
        let forwarded = trust_forwarded_proto
            .then(|| parts.headers.get(FORWARDED_PROTO_HEADER))
            .flatten()
            .and_then(|v| v.to_str().ok())
            // Proxies may append a list; the first hop is the client's
            .and_then(|v| v.split(',').next())
            .map(Scheme::parse);

        let scheme = forwarded
            .or_else(|| parts.uri.scheme_str().map(Scheme::parse))
            .unwrap_or(Scheme::Http);

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        let client_key = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string);

        let mut query = HashMap::new();
        if let Some(raw) = parts.uri.query() {
            for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                query.entry(key.into_owned()).or_insert_with(|| value.into_owned());
            }
        }

        Self {
            authority: normalize_authority(&scheme, &host),
            scheme,
            client_key,
            query,
        }
    }

    /// Whether endpoint descriptors should be attached to the response
    ///
    /// Absent key means yes; present means yes only for a case-insensitive `true`.
    pub fn include_endpoints(&self, key: &str) -> bool {
        match self.query.get(key) {
            None => true,
            Some(value) => value.trim().eq_ignore_ascii_case("true"),
        }
    }
}

/// `host:port` for the request, falling back to the raw host when unparsable
fn normalize_authority(scheme: &Scheme, host: &str) -> String {
    let parsed = Url::parse(&format!("{}://{}", scheme, host)).ok().and_then(|url| {
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default()?;
        Some(format!("{}:{}", host, port))
    });

    parsed.unwrap_or_else(|| host.to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, state.config.security.trust_forwarded_proto))
    }
}
