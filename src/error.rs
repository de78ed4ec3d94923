//! Application error taxonomy and the centralized error normalizer.
//!
//! Every failure a handler can produce is one of four cases, and every case
//! maps to exactly one status code. Handlers return `Err(Error)` and never
//! build their own error responses; [`render`] is the single place where an
//! error becomes bytes, so the JSON and HTML surfaces can never drift apart.

use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::pages;
use crate::response::Response;

/// One field-level problem in a request payload.
///
/// Validation failures carry a list of these; the API renders them verbatim
/// under `"detail"`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// The error type returned by quill's operations.
///
/// Infrastructure failures (bind, accept) live in [`crate::server`]; this
/// type covers everything a request can do wrong.
#[derive(Debug, Error)]
pub enum Error {
    /// The id or path resolved to no entity. `404`.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness constraint would be violated. `400`.
    #[error("{0}")]
    Conflict(String),

    /// The request shape is wrong: unparseable body, missing required
    /// fields, non-integer path id. `422`.
    #[error("Invalid request data")]
    Validation(Vec<FieldError>),

    /// Something on our side broke. `500`.
    #[error("{0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// A validation failure with a single field error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn is_api(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Turns an error into the response the client actually sees.
///
/// Requests under `/api` get a JSON body — `{"detail": "<message>"}`, or
/// `{"detail": [<field errors>]}` for validation failures. Everything else
/// gets an HTML error page titled with the status code. The status code is
/// the same on both surfaces.
pub(crate) fn render(err: &Error, path: &str) -> Response {
    let status = err.status();
    if is_api(path) {
        let detail = match err {
            Error::Validation(fields) => serde_json::json!({ "detail": fields }),
            other => serde_json::json!({ "detail": other.to_string() }),
        };
        let body = serde_json::to_vec(&detail)
            .unwrap_or_else(|_| br#"{"detail":"Internal Server Error"}"#.to_vec());
        Response::builder().status(status).json(body)
    } else {
        pages::error_page(status, &err.to_string())
    }
}
