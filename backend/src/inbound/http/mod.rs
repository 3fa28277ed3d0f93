//! HTTP inbound adapter exposing the REST endpoints.

pub mod courses;
pub mod envelope;
pub mod error;
pub mod groups;
pub mod health;
pub mod professors;
pub mod query;
pub mod semesters;
pub mod state;
pub mod subjects;
pub mod tags;

pub use error::ApiResult;
