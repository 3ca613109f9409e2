use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::routes::EndpointDescriptor;

/// Uniform envelope returned by every pipeline operation
///
/// `content` is absent for routes-only listings and for operations that
/// produced no payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    #[serde(skip_serializing_if = "Option::is_none", default = "Option::default")]
    pub content: Option<T>,
    #[serde(default = "Vec::new")]
    pub endpoint_items: Vec<EndpointDescriptor>,
}

impl<T> ResponseEnvelope<T> {
    pub fn new(content: Option<T>) -> Self {
        Self {
            content,
            endpoint_items: Vec::new(),
        }
    }

    /// Envelope carrying only endpoint descriptors
    pub fn routes(endpoint_items: Vec<EndpointDescriptor>) -> Self {
        Self {
            content: None,
            endpoint_items,
        }
    }

    /// Drop the payload, keeping the endpoint listing
    pub fn without_content<V>(self) -> ResponseEnvelope<V> {
        ResponseEnvelope::routes(self.endpoint_items)
    }
}

impl<T: Serialize> IntoResponse for ResponseEnvelope<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self) {
            Ok(value) => (StatusCode::OK, Json(value)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response envelope: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": true,
                        "message": "Failed to serialize response data",
                        "code": "INTERNAL_SERVER_ERROR"
                    })),
                )
                    .into_response()
            }
        }
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ResponseEnvelope<T>, crate::error::ApiError>;
