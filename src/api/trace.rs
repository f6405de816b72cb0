//! Request trace ids: accepted from the caller or generated, then carried
//! through logs, response headers and error bodies.

use axum::{
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::error::{ErrorMessage, ErrorResponse};

/// HTTP header name for trace ID
pub const TRACE_ID_HEADER: &str = "Trace-Id";

/// Resolve the trace id of a request: a non-blank `Trace-Id` header wins,
/// otherwise a UUID v4 is generated.
fn resolve_trace_id(request: &Request) -> String {
    request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub async fn trace_id_middleware(request: Request, next: Next) -> Response {
    let trace_id = resolve_trace_id(&request);

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    let response = async move {
        let response = next.run(request).await;
        tracing::debug!(status = %response.status(), "Request completed");
        response
    }
    .instrument(span)
    .await;

    let mut response = stamp_error_body(response, &trace_id);
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

/// Rewrite error bodies so they carry the request's trace id
fn stamp_error_body(response: Response, trace_id: &str) -> Response {
    let Some(ErrorMessage(message)) = response.extensions().get::<ErrorMessage>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    let (fresh, body) = Json(ErrorResponse {
        trace_id: trace_id.to_string(),
        error_message: message,
    })
    .into_response()
    .into_parts();

    parts.headers.remove(CONTENT_LENGTH);
    if let Some(content_type) = fresh.headers.get(CONTENT_TYPE) {
        parts.headers.insert(CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn ok() -> &'static str {
        "ok"
    }

    async fn failing() -> Result<String, AppError> {
        Err(AppError::NotFound("Publisher Id: 4 Not Found".to_string()))
    }

    fn app() -> Router {
        Router::new()
            .route("/ok", get(ok))
            .route("/fail", get(failing))
            .layer(middleware::from_fn(trace_id_middleware))
    }

    #[tokio::test]
    async fn test_generates_uuid_when_absent() {
        let request = Request::builder().uri("/ok").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let header = response.headers().get(TRACE_ID_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(header).is_ok());
    }

    #[tokio::test]
    async fn test_caller_trace_id_is_kept() {
        let request = Request::builder()
            .uri("/ok")
            .header(TRACE_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get(TRACE_ID_HEADER).unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_blank_trace_id_is_replaced() {
        let request = Request::builder()
            .uri("/ok")
            .header(TRACE_ID_HEADER, "   ")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let header = response.headers().get(TRACE_ID_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(header).is_ok());
    }

    #[tokio::test]
    async fn test_error_body_carries_trace_id() {
        let request = Request::builder()
            .uri("/fail")
            .header(TRACE_ID_HEADER, "trace-42")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["traceId"], "trace-42");
        assert_eq!(body["errorMessage"], "Publisher Id: 4 Not Found");
    }
}
