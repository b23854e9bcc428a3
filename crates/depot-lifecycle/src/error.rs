use crate::config::ConfigError;
use crate::lifecycle::rules::BusinessViolation;
use crate::lifecycle::service::LifecycleServiceError;
use crate::schema::Violations;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Top-level failures of the CLI and server bootstrap.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Json(serde_json::Error),
    UnknownSchema(String),
    Invalid(Violations),
    Fixtures(LifecycleServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::UnknownSchema(name) => write!(f, "unknown schema `{}`", name),
            AppError::Invalid(err) => write!(f, "{}", err),
            AppError::Fixtures(err) => write!(f, "fixture seeding failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Invalid(err) => Some(err),
            AppError::Fixtures(err) => Some(err),
            AppError::UnknownSchema(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Json(_) | AppError::UnknownSchema(_) | AppError::Invalid(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Fixtures(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<LifecycleServiceError> for AppError {
    fn from(value: LifecycleServiceError) -> Self {
        Self::Fixtures(value)
    }
}

impl From<Violations> for AppError {
    fn from(value: Violations) -> Self {
        Self::Invalid(value)
    }
}

pub const INVALID_REQUEST_CODE: &str = "REQ400";
pub const UNAUTHORIZED_CODE: &str = "AUT401";
pub const NOT_FOUND_CODE: &str = "NFD404";
pub const UNAVAILABLE_CODE: &str = "SRV500";
pub const NOT_IMPLEMENTED_CODE: &str = "NIM501";

/// Error envelope returned by every failing API call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        if !details.is_empty() {
            self.details = Some(details);
        }
        self
    }
}

impl From<Violations> for ErrorResponse {
    fn from(value: Violations) -> Self {
        ErrorResponse::new(
            INVALID_REQUEST_CODE,
            format!("{} request is invalid", value.schema),
        )
        .with_details(value.details())
    }
}

impl From<&BusinessViolation> for ErrorResponse {
    fn from(value: &BusinessViolation) -> Self {
        ErrorResponse::new(value.code(), value.to_string()).with_details(value.details())
    }
}

/// Request failure mapped onto the documented status codes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{}", .0.message)]
    InvalidRequest(ErrorResponse),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Business(#[from] BusinessViolation),
    #[error("{0}")]
    NotImplemented(String),
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Business(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            ApiError::InvalidRequest(body) => body.clone(),
            ApiError::Unauthorized(message) => ErrorResponse::new(UNAUTHORIZED_CODE, message),
            ApiError::NotFound(message) => ErrorResponse::new(NOT_FOUND_CODE, message),
            ApiError::Business(violation) => ErrorResponse::from(violation),
            ApiError::NotImplemented(message) => ErrorResponse::new(NOT_IMPLEMENTED_CODE, message),
            ApiError::Unavailable(message) => ErrorResponse::new(UNAVAILABLE_CODE, message),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(ErrorResponse::new(INVALID_REQUEST_CODE, message))
    }
}

impl From<Violations> for ApiError {
    fn from(value: Violations) -> Self {
        ApiError::InvalidRequest(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{catalog, validate};

    #[test]
    fn violations_become_request_errors_with_details() {
        let err = validate(&catalog::PARTY, &json!({ "companyId": "short" }))
            .expect_err("invalid company id");
        let body = ErrorResponse::from(err);

        assert_eq!(body.code, INVALID_REQUEST_CODE);
        let details = body.details.expect("details listed");
        assert_eq!(details.len(), 1);
        assert!(details[0].starts_with("companyId: must match pattern"));
    }

    #[test]
    fn details_are_omitted_when_empty() {
        let body = ErrorResponse::new(NOT_FOUND_CODE, "missing").with_details(Vec::new());
        let json = serde_json::to_value(&body).expect("serializes");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn business_violations_use_method_not_allowed() {
        let err = ApiError::from(BusinessViolation::UnknownParty {
            company_id: "ZZZZZZZZZ".into(),
        });
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.body().code, "PTY405");
    }

    #[test]
    fn every_error_code_matches_the_response_code_pattern() {
        let pattern = regex::Regex::new(catalog::RESPONSE_CODE).expect("pattern compiles");
        for code in [
            INVALID_REQUEST_CODE,
            UNAUTHORIZED_CODE,
            NOT_FOUND_CODE,
            UNAVAILABLE_CODE,
            NOT_IMPLEMENTED_CODE,
        ] {
            assert!(pattern.is_match(code), "{code}");
        }
    }
}
