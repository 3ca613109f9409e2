use crate::types::PermissionLevel;

/// REST description attached to an operation
/// Operations without one never show up in endpoint listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestInfo {
    pub http_method: String,
    pub description: String,
    pub model_name: Option<String>,
}

impl RestInfo {
    pub fn new(http_method: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            description: description.into(),
            model_name: None,
        }
    }

    /// Blank model names mean the operation takes no request body
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        self.model_name = if model_name.trim().is_empty() {
            None
        } else {
            Some(model_name)
        };
        self
    }

    pub fn requires_model(&self) -> bool {
        self.model_name.is_some()
    }
}

/// Static metadata for one exposed operation, registered once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMetadata {
    pub name: String,
    pub exposed: bool,
    pub route: Option<String>,
    pub rest_info: Option<RestInfo>,
    access_markers: Vec<PermissionLevel>,
}

impl OperationMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exposed: true,
            route: None,
            rest_info: None,
            access_markers: Vec::new(),
        }
    }

    pub fn route(mut self, template: impl Into<String>) -> Self {
        self.route = Some(template.into());
        self
    }

    pub fn rest_info(
        mut self,
        http_method: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.rest_info = Some(RestInfo::new(http_method, description));
        self
    }

    pub fn rest_info_with_model(
        mut self,
        http_method: impl Into<String>,
        description: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        self.rest_info = Some(RestInfo::new(http_method, description).with_model(model_name));
        self
    }

    /// Hide the operation from discovery
    pub fn internal(mut self) -> Self {
        self.exposed = false;
        self
    }

    pub fn requires_read(mut self) -> Self {
        self.access_markers.push(PermissionLevel::Read);
        self
    }

    pub fn requires_write(mut self) -> Self {
        self.access_markers.push(PermissionLevel::Write);
        self
    }

    pub fn requires_admin(mut self) -> Self {
        self.access_markers.push(PermissionLevel::Admin);
        self
    }

    /// One entry per declared marker, in declaration order, duplicates kept
    pub fn required_permissions(&self) -> Vec<PermissionLevel> {
        self.access_markers.clone()
    }
}

/// A handler: a named group of operations plus the handlers it links to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMetadata {
    pub name: String,
    pub route_prefix: Option<String>,
    pub include_endpoints_key: Option<String>,
    pub operations: Vec<OperationMetadata>,
    pub related: Vec<String>,
}

impl HandlerMetadata {
    pub fn builder(name: impl Into<String>) -> HandlerBuilder {
        HandlerBuilder {
            inner: HandlerMetadata {
                name: name.into(),
                route_prefix: None,
                include_endpoints_key: None,
                operations: Vec::new(),
                related: Vec::new(),
            },
        }
    }

    pub fn operation(&self, name: &str) -> Option<&OperationMetadata> {
        self.operations.iter().find(|op| op.name == name)
    }
}

pub struct HandlerBuilder {
    inner: HandlerMetadata,
}

impl HandlerBuilder {
    pub fn route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.route_prefix = Some(prefix.into());
        self
    }

    /// Override the query key that toggles endpoint enrichment for this handler
    pub fn include_endpoints_key(mut self, key: impl Into<String>) -> Self {
        self.inner.include_endpoints_key = Some(key.into());
        self
    }

    pub fn operation(mut self, operation: OperationMetadata) -> Self {
        self.inner.operations.push(operation);
        self
    }

    pub fn related(mut self, handler: impl Into<String>) -> Self {
        self.inner.related.push(handler.into());
        self
    }

    pub fn build(self) -> HandlerMetadata {
        self.inner
    }
}
