pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod registry;

pub use descriptor::EndpointDescriptor;
pub use error::DiscoveryError;
pub use metadata::{HandlerBuilder, HandlerMetadata, OperationMetadata, RestInfo};
pub use registry::{build_full_path, RouteRegistry, RouteRegistryBuilder, ABSOLUTE_MARKER};
