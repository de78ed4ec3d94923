//! # quill
//!
//! A small blog service: two entities (users and posts, one-to-many),
//! served twice — server-rendered HTML pages and a JSON REST API under
//! `/api` — with one shared error-normalization layer behind both.
//!
//! ## The contract
//!
//! Every failure, wherever it originates, comes out of the same normalizer:
//! JSON `{"detail": …}` for `/api/*` paths, an HTML error page everywhere
//! else, with the same status code either way. Handlers never build error
//! responses themselves.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quill::{routes, Db, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let db = Arc::new(Db::new());
//!     Server::bind("0.0.0.0:3000")
//!         .serve(routes(), db)
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! Try:
//!
//! ```text
//! curl -X POST localhost:3000/api/users \
//!      -d '{"username":"amy","email":"amy@x.com"}'
//! curl localhost:3000/api/users/1/posts
//! curl localhost:3000/posts
//! ```

mod api;
mod error;
mod handler;
mod models;
mod pages;
mod request;
mod response;
mod router;
mod server;
mod store;

pub use error::{Error, FieldError};
pub use handler::Handler;
pub use models::{NewPost, NewUser, Post, PostPatch, PostReplace, User, UserPatch};
pub use request::Request;
pub use response::{Response, ResponseBuilder};
pub use router::Router;
pub use server::{ServeError, Server};
pub use store::Db;

/// The full route table: the HTML pages and the JSON API.
pub fn routes() -> Router {
    Router::new()
        // HTML
        .get("/", pages::home)
        .get("/posts", pages::post_index)
        .get("/posts/{id}", pages::post_detail)
        .get("/users/{id}/posts", pages::user_posts)
        // JSON API — posts
        .get("/api/posts", api::posts::index)
        .get("/api/posts/{id}", api::posts::show)
        .post("/api/posts", api::posts::create)
        .put("/api/posts/{id}", api::posts::replace)
        .patch("/api/posts/{id}", api::posts::patch)
        .delete("/api/posts/{id}", api::posts::remove)
        // JSON API — users
        .get("/api/users", api::users::index)
        .get("/api/users/{id}", api::users::show)
        .get("/api/users/{id}/posts", api::users::posts)
        .post("/api/users", api::users::create)
        .patch("/api/users/{id}", api::users::patch)
        .delete("/api/users/{id}", api::users::remove)
}
