//! Error types for the Bookshelf server

use std::borrow::Cow;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const BAD_REQUEST_MESSAGE: &str = "Bad request: the server cannot or will not process the \
request due to something that is perceived to be a client error.";

pub const FORBIDDEN_MESSAGE: &str =
    "Forbidden: the server understood the request but refuses to authorize it.";

pub const NOT_FOUND_MESSAGE: &str =
    "Not found: indicates that the server can't find the requested resource";

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed: the request method is known by \
the server but is not supported by the target resource.";

pub const UNPROCESSABLE_MESSAGE: &str = "Unprocessable: the server understands the content type \
of the request entity, and the syntax of the request entity is correct, but it was unable to \
process the contained instruction";

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error: the server encountered an \
unexpected condition that prevented it from fulfilling the request.";

/// Main application error type.
///
/// The payload of each variant is a diagnostic detail that is logged but never
/// sent to the client; the client always receives the fixed message for the code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a framework-produced status back into the taxonomy, if it belongs to it.
    pub fn from_status(status: StatusCode, detail: impl Into<String>) -> Option<Self> {
        let detail = detail.into();
        match status {
            StatusCode::NOT_FOUND => Some(AppError::NotFound(detail)),
            StatusCode::BAD_REQUEST => Some(AppError::BadRequest(detail)),
            StatusCode::UNPROCESSABLE_ENTITY => Some(AppError::Unprocessable(detail)),
            StatusCode::FORBIDDEN => Some(AppError::Forbidden(detail)),
            StatusCode::METHOD_NOT_ALLOWED => Some(AppError::MethodNotAllowed),
            StatusCode::INTERNAL_SERVER_ERROR => Some(AppError::Internal(detail)),
            _ => None,
        }
    }
}

/// Error envelope returned for every failed request
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// HTTP status code
    pub error: u16,
    /// Fixed human-readable message for the status code
    pub message: String,
}

impl ErrorResponse {
    pub fn for_status(status: StatusCode) -> Self {
        Self {
            success: false,
            error: status.as_u16(),
            message: message_for(status).into_owned(),
        }
    }
}

/// Fixed message for a status code. Codes outside the taxonomy fall back to
/// the canonical reason phrase.
pub fn message_for(status: StatusCode) -> Cow<'static, str> {
    match status {
        StatusCode::BAD_REQUEST => Cow::Borrowed(BAD_REQUEST_MESSAGE),
        StatusCode::FORBIDDEN => Cow::Borrowed(FORBIDDEN_MESSAGE),
        StatusCode::NOT_FOUND => Cow::Borrowed(NOT_FOUND_MESSAGE),
        StatusCode::METHOD_NOT_ALLOWED => Cow::Borrowed(METHOD_NOT_ALLOWED_MESSAGE),
        StatusCode::UNPROCESSABLE_ENTITY => Cow::Borrowed(UNPROCESSABLE_MESSAGE),
        StatusCode::INTERNAL_SERVER_ERROR => Cow::Borrowed(INTERNAL_ERROR_MESSAGE),
        other => Cow::Owned(
            other
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        ),
    }
}

/// Render the error envelope for a bare status code.
pub fn envelope(status: StatusCode) -> Response {
    (status, Json(ErrorResponse::for_status(status))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            AppError::Unprocessable(detail) => tracing::warn!("Unprocessable: {}", detail),
            other => tracing::debug!(status = status.as_u16(), "{}", other),
        }
        envelope(status)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// A path segment that does not parse as a book id never matched a route.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::NotFound(rejection.body_text())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_renders_envelope() {
        let response = AppError::NotFound("book 7".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 404);
        assert_eq!(body["message"], NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn detail_is_not_leaked() {
        let response = AppError::Internal("connection refused".to_string()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], 500);
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::BadRequest(String::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unprocessable(String::new()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Forbidden(String::new()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn framework_statuses_map_into_taxonomy() {
        assert!(matches!(
            AppError::from_status(StatusCode::METHOD_NOT_ALLOWED, ""),
            Some(AppError::MethodNotAllowed)
        ));
        assert!(matches!(
            AppError::from_status(StatusCode::FORBIDDEN, "denied"),
            Some(AppError::Forbidden(_))
        ));
        assert!(AppError::from_status(StatusCode::REQUEST_TIMEOUT, "").is_none());
    }

    #[test]
    fn unknown_status_uses_reason_phrase() {
        let body = ErrorResponse::for_status(StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body.error, 408);
        assert_eq!(body.message, "Request Timeout");
    }
}
