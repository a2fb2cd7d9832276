use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::DomainError;

/// Error payload returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human readable message
    pub error: String,
    /// HTTP status code
    pub code: u16,
    /// Stable error class: `not_found`, `conflict`, `validation`, `unavailable` or `internal`
    pub kind: String,
    /// Request path that produced the error
    pub instance: String,
    /// RFC3339 timestamp when the error occurred
    pub timestamp: String,
    pub request_id: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Where a request came from, for error reporting.
#[derive(Debug, Clone)]
pub struct RequestCtx {
    pub instance: String,
    pub request_id: Option<String>,
}

impl<S> FromRequestParts<S> for RequestCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new(&parts.uri, &parts.headers))
    }
}

impl RequestCtx {
    pub fn new(uri: &Uri, headers: &HeaderMap) -> Self {
        let request_id = headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Self {
            instance: uri.path().to_owned(),
            request_id,
        }
    }
}

impl ApiError {
    /// 400 for input that never reached the service: unparsable ids, bodies or queries.
    pub fn validation(message: impl Into<String>, ctx: &RequestCtx) -> Self {
        from_parts(StatusCode::BAD_REQUEST, "validation", message, ctx)
    }
}

fn from_parts(status: StatusCode, kind: &str, error: impl Into<String>, ctx: &RequestCtx) -> ApiError {
    ApiError {
        status,
        body: ErrorBody {
            error: error.into(),
            code: status.as_u16(),
            kind: kind.to_owned(),
            instance: ctx.instance.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id: ctx.request_id.clone(),
        },
    }
}

/// Map a domain error to its HTTP representation.
///
/// Conflicts and closed courses are reported as 400 to stay compatible with
/// existing clients.
pub fn map_domain_error(e: &DomainError, ctx: &RequestCtx) -> ApiError {
    use DomainError::*;
    match e {
        CourseNotFound { .. }
        | ClassNotFound { .. }
        | StudentNotFound { .. }
        | AttendanceNotFound { .. }
        | NoticeNotFound { .. }
        | NotEnrolled { .. } => from_parts(StatusCode::NOT_FOUND, "not_found", e.to_string(), ctx),
        AttendanceAlreadyMarked { .. } | AlreadyEnrolled { .. } => {
            from_parts(StatusCode::BAD_REQUEST, "conflict", e.to_string(), ctx)
        }
        CourseUnavailable { .. } => {
            from_parts(StatusCode::BAD_REQUEST, "unavailable", e.to_string(), ctx)
        }
        InvalidPresence { .. } | Validation { .. } => {
            from_parts(StatusCode::BAD_REQUEST, "validation", e.to_string(), ctx)
        }
        Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, request_id = ?ctx.request_id, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "An internal error occurred",
                ctx,
            )
        }
    }
}
