//! Radix-tree request router and the request/error pipeline.
//!
//! One [`matchit`] tree per HTTP method, O(path-length) lookup. Beyond
//! lookup, [`Router::respond`] is the whole request pipeline: match a
//! handler, run it, and feed any error — including a route miss — through
//! the centralized normalizer so the JSON and HTML error surfaces stay
//! consistent. The hyper server and the integration tests both enter here.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::Method;
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::error::{self, Error};
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;
use crate::store::Db;

/// The application router.
///
/// Build it once at startup; each registration call returns `self` so the
/// route table reads as one chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves
    /// them.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.add(Method::DELETE, path, handler)
    }

    fn add(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Routes one request to its response.
    ///
    /// Handler errors and route misses alike go through the error
    /// normalizer, which picks JSON or HTML from the path prefix.
    pub async fn respond(&self, method: Method, path: &str, body: Bytes, db: Arc<Db>) -> Response {
        let response = match self.lookup(&method, path) {
            Some((handler, params)) => {
                let req = Request::new(method.clone(), path.to_owned(), params, body, db);
                match handler.call(req).await {
                    Ok(response) => response,
                    Err(err) => error::render(&err, path),
                }
            }
            None => error::render(&Error::not_found("Not Found"), path),
        };
        debug!(%method, path, status = response.status_code().as_u16(), "handled");
        response
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
