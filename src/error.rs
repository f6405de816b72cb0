//! Error types for the Library APIs server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{}", format_validation_errors(.0))]
    Validation(#[from] validator::ValidationErrors),

    /// Missing or invalid token, wrong role, or acting on another user's record
    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub trace_id: String,
    pub error_message: String,
}

/// Marker left on error responses so the trace middleware can stamp the
/// request's trace id into the body.
#[derive(Debug, Clone)]
pub struct ErrorMessage(pub String);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Anything unclassified is reported to the caller as a bad request
            AppError::Database(_) | AppError::Internal(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Map an insert/update failure, turning unique violations into `AlreadyExists`
    pub fn on_conflict(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::AlreadyExists(message.to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Database(e) => tracing::error!(error = ?e, "Database error"),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            other => tracing::debug!(status = %status, "Request rejected: {}", other),
        }

        let message = self.to_string();
        let body = Json(ErrorResponse {
            trace_id: String::new(),
            error_message: message.clone(),
        });

        let mut response = (status, body).into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_validation_messages(errors, &mut messages);
    messages.sort();
    messages.join("; ")
}

fn collect_validation_messages(errors: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_validation_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_validation_messages(nested, out);
                }
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, max = 5, message = "Name must be between 1 and 5 characters"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::AlreadyExists("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Internal("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_validation_message_lists_every_field() {
        let probe = Probe {
            name: "far too long".to_string(),
            email: "not-an-email".to_string(),
        };
        let err = AppError::from(probe.validate().unwrap_err());
        let message = err.to_string();
        assert!(message.contains("Name must be between 1 and 5 characters"));
        assert!(message.contains("email is invalid"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_non_unique_database_error_is_kept() {
        let err = AppError::on_conflict(sqlx::Error::RowNotFound, "Publisher already exists!!");
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::NotFound("Book Id: 7 Not Found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorMessage>().is_some());

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errorMessage"], "Book Id: 7 Not Found");
        assert!(body.get("traceId").is_some());
    }
}
