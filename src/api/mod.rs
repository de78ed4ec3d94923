//! JSON API handlers, one module per entity.
//!
//! Handlers are thin: parse the path and body, call one store operation,
//! serialize the result. Everything that can go wrong is an [`Error`]
//! propagated with `?` into the centralized normalizer.
//!
//! [`Error`]: crate::error::Error

pub mod posts;
pub mod users;
