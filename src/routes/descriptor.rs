use serde::{Deserialize, Serialize};

/// One endpoint as seen by API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    pub http_method: String,
    pub full_path: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub required_model_name: Option<String>,
}

impl EndpointDescriptor {
    pub fn new(
        http_method: impl Into<String>,
        full_path: impl Into<String>,
        description: impl Into<String>,
        required_model_name: Option<String>,
    ) -> Self {
        Self {
            http_method: http_method.into(),
            full_path: full_path.into(),
            description: description.into(),
            required_model_name,
        }
    }
}
