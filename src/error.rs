use crate::auth::InitDataError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid authentication")]
    InvalidAuthentication,

    #[error("permission denied")]
    PermissionDenied,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl Error {
    fn error_type(&self) -> &'static str {
        match self {
            Error::InvalidAuthentication => "InvalidAuthentication",
            Error::PermissionDenied => "PermissionDenied",
            Error::NotFound(_) => "NotFound",
            Error::InvalidInput(_) => "InvalidInput",
            Error::Validation(_) => "ValidationFailed",
            Error::Conflict(_) => "Conflict",
            Error::Upstream(_) => "UpstreamError",
            Error::Internal(_) => "InternalError",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidAuthentication => StatusCode::UNAUTHORIZED,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every initData rejection looks the same to the client.
impl From<InitDataError> for Error {
    fn from(err: InitDataError) -> Self {
        tracing::debug!("initData rejected: {}", err);
        Error::InvalidAuthentication
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match &self {
            // Internal details stay in the logs.
            Error::Internal(detail) | Error::Upstream(detail) => {
                tracing::error!("{}: {}", self.error_type(), detail);
                self.error_type().to_string()
            }
            _ => self.to_string(),
        };

        let status = self.status_code();
        let error = self.error_type();
        let details = match self {
            Error::Validation(fields) => fields,
            _ => Vec::new(),
        };

        let body = ErrorBody {
            error,
            message,
            details,
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_data_errors_are_indistinguishable() {
        for err in [
            InitDataError::MalformedInput,
            InitDataError::MissingSignature,
            InitDataError::MissingTimestamp,
            InitDataError::BadTimestamp,
            InitDataError::Expired,
            InitDataError::BadSignature,
        ] {
            let mapped = Error::from(err);
            assert!(matches!(mapped, Error::InvalidAuthentication));
            assert_eq!(mapped.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Validation(vec![]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::Upstream("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            Error::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let err = Error::Validation(vec![
            FieldError::new("title", "field is required and cannot be empty"),
            FieldError::new("data.url", "url must be a valid HTTP/HTTPS URL"),
        ]);
        let body = ErrorBody {
            error: err.error_type(),
            message: err.to_string(),
            details: match err {
                Error::Validation(fields) => fields,
                _ => unreachable!(),
            },
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["error"], "ValidationFailed");
        assert_eq!(value["details"][1]["field"], "data.url");
    }
}
