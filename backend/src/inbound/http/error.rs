//! HTTP adapter mapping for domain errors.
//!
//! Handlers return [`ApiResult`]; the domain [`Error`] renders itself as the
//! JSON envelope `{code, message, traceId?, details?}` with a status derived
//! from its code. Body and query extraction failures are routed through the
//! same envelope so clients only ever parse one error shape.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        if self.code() != ErrorCode::InternalError {
            return builder.json(self);
        }
        // Storage messages name keys and paths; clients only see the trace id.
        error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        builder.json(self.clone().redacted(REDACTED_MESSAGE))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(REDACTED_MESSAGE)
    }
}

fn malformed(kind: &'static str, detail: String) -> Error {
    debug!(kind, %detail, "rejecting malformed request");
    Error::invalid_request(format!("malformed {kind}"))
        .with_details(json!({ "code": format!("malformed_{kind}"), "reason": detail }))
}

/// Render JSON body extraction failures as `invalid_request` errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed("body", err.to_string()).into()
}

/// Render query-string extraction failures as `invalid_request` errors.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed("query", err.to_string()).into()
}

/// Extractor configuration wiring both handlers; register it with
/// `App::configure` or `Scope::configure`.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));
}

#[cfg(test)]
mod tests;
