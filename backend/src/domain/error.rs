//! Transport-agnostic error payload.
//!
//! Domain services return entity-specific error enums; inbound adapters
//! convert those into this single payload type so every endpoint produces the
//! same error schema regardless of which operation failed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::name::NameError;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// The write conflicts with existing state (duplicate name or tuple).
    Conflict,
    /// The database could not be reached.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Error payload serialised into the response envelope.
///
/// `details` carries field-specific context (which field failed, the
/// offending value) so clients can highlight the right form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "name must not be empty")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Map a name-validation failure onto the shared payload, tagging the
    /// offended field so clients can re-render the right input.
    pub fn from_name_error(field: &str, err: &NameError) -> Self {
        match err {
            NameError::Empty => Self::invalid_request("name must not be empty")
                .with_details(serde_json::json!({ "field": field, "code": "name_empty" })),
            NameError::Reserved { name } => {
                Self::invalid_request(format!("name \"{name}\" is reserved")).with_details(
                    serde_json::json!({ "field": field, "code": "name_reserved", "value": name }),
                )
            }
            NameError::PatternNotAllowed { pattern } => {
                Self::invalid_request(format!("name pattern \"{pattern}\" is not allowed"))
                    .with_details(serde_json::json!({
                        "field": field,
                        "code": "name_pattern_not_allowed",
                        "pattern": pattern,
                    }))
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn serialises_code_as_snake_case() {
        let err = Error::conflict("subject \"math\" already exists");
        let value = serde_json::to_value(&err).expect("serialise error");
        assert_eq!(value["code"], "conflict");
        assert!(value.get("details").is_none());
    }

    #[rstest]
    fn name_errors_carry_field_details() {
        let err = Error::from_name_error(
            "name",
            &NameError::Reserved {
                name: "admin".to_owned(),
            },
        );
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "name");
        assert_eq!(details["code"], "name_reserved");
        assert_eq!(details["value"], "admin");
    }
}
