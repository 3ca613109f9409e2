pub mod context;
pub mod response;

pub use context::{RequestContext, FORWARDED_PROTO_HEADER};
pub use response::{ApiResult, ResponseEnvelope};
