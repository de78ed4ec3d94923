//! Incoming HTTP request type.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::store::Db;

/// An incoming HTTP request, plus the matched path parameters and a handle
/// to the shared store.
pub struct Request {
    method: Method,
    path: String,
    params: HashMap<String, String>,
    body: Bytes,
    db: Arc<Db>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        params: HashMap<String, String>,
        body: Bytes,
        db: Arc<Db>,
    ) -> Self {
        Self { method, path, params, body, db }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/posts/{id}`, `req.param("id")` on `/posts/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// A path parameter parsed as an entity id.
    ///
    /// A non-integer value is a request-shape problem, not a missing
    /// entity: it fails with a 422 field error, never a 404.
    pub fn param_id(&self, key: &str) -> Result<i64, Error> {
        let raw = self
            .param(key)
            .ok_or_else(|| Error::Internal(format!("route has no `{key}` parameter")))?;
        raw.parse()
            .map_err(|_| Error::invalid(key, "value is not a valid integer"))
    }

    /// Deserializes the body as JSON into `T`.
    ///
    /// Anything serde rejects — empty body, malformed JSON, missing
    /// required fields, wrong field types — becomes a 422 with the parser's
    /// message attached to the `body` field.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::invalid("body", e.to_string()))
    }
}
