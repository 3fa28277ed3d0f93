//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns,
//! currently structured request logging.

pub mod request_log;

pub use request_log::RequestLog;
