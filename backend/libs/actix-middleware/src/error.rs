use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Rejection from the request gates.
///
/// Carries the same wire shape as the services' error bodies —
/// `{ error, message, status }` — so clients can branch on the machine
/// kind regardless of whether a rejection came from a handler or from
/// the middleware in front of it.
#[derive(Debug)]
pub enum GateError {
    Unauthenticated(&'static str),
    Forbidden(&'static str),
}

impl GateError {
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Unauthenticated(_) => "unauthenticated",
            GateError::Forbidden(_) => "forbidden",
        }
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::Unauthenticated(msg) | GateError::Forbidden(msg) => f.write_str(msg),
        }
    }
}

impl ResponseError for GateError {
    fn status_code(&self) -> StatusCode {
        match self {
            GateError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GateError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(json!({
            "error": self.kind(),
            "message": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}
