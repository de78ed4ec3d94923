//! Outgoing HTTP response type.
//!
//! Handlers build a [`Response`] with the shortcut constructors and return
//! it; [`Response::into_http`] converts it for hyper at the very edge.
//!
//! # Shortcuts
//!
//! ```rust,ignore
//! Response::json(&post)?;            // 200, application/json
//! Response::created(&post)?;         // 201, application/json
//! Response::no_content();            // 204, empty
//! Response::html(page);              // 200, text/html
//! ```
//!
//! # Builder (custom status or headers)
//!
//! ```rust,ignore
//! Response::builder()
//!     .status(StatusCode::NOT_FOUND)
//!     .json(body_bytes);
//! ```

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

use crate::error::Error;

/// An outgoing HTTP response.
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// `200 OK` with `value` serialized as the JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Self::builder().json(serialize(value)?))
    }

    /// `201 Created` with `value` serialized as the JSON body.
    pub fn created<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Self::builder()
            .status(StatusCode::CREATED)
            .json(serialize(value)?))
    }

    /// `204 No Content`.
    pub fn no_content() -> Self {
        Self::status(StatusCode::NO_CONTENT)
    }

    /// `200 OK` with an HTML body.
    pub fn html(body: String) -> Self {
        Self::builder().html(body)
    }

    /// Response with the given status and no body.
    pub fn status(code: StatusCode) -> Self {
        Self {
            status: code,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder {
            status: StatusCode::OK,
            headers: Vec::new(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        // All header names and values come from our own constructors.
        builder
            .body(Full::new(Bytes::from(self.body)))
            .expect("response parts are statically valid")
    }
}

fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(|e| Error::Internal(format!("response serialization: {e}")))
}

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`. Terminated by
/// a typed body method.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        self.finish("application/json", body)
    }

    /// Terminate with an HTML body (`text/html; charset=utf-8`).
    pub fn html(self, body: String) -> Response {
        self.finish("text/html; charset=utf-8", body.into_bytes())
    }

    /// Terminate with no body.
    pub fn no_body(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: Vec::new(),
        }
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response {
            status: self.status,
            headers,
            body,
        }
    }
}
