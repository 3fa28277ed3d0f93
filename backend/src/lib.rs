//! Backend library modules for the academic catalogue service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling and the `/api-docs` endpoint.
pub use doc::ApiDoc;
pub use middleware::RequestLog;
