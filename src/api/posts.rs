//! `/api/posts` handlers.

use crate::error::Error;
use crate::models::{NewPost, PostPatch, PostReplace};
use crate::request::Request;
use crate::response::Response;

/// `GET /api/posts`
pub async fn index(req: Request) -> Result<Response, Error> {
    let posts = req.db().posts().await;
    Response::json(&posts)
}

/// `GET /api/posts/{id}`
pub async fn show(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    let post = req.db().post(id).await?;
    Response::json(&post)
}

/// `POST /api/posts` — 201, or 404 when `user_id` references no user.
pub async fn create(req: Request) -> Result<Response, Error> {
    let payload: NewPost = req.json()?;
    let post = req.db().create_post(payload).await?;
    Response::created(&post)
}

/// `PUT /api/posts/{id}` — full replace; 404 when the post or a new owner
/// is missing.
pub async fn replace(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    let payload: PostReplace = req.json()?;
    let post = req.db().replace_post(id, payload).await?;
    Response::json(&post)
}

/// `PATCH /api/posts/{id}`
pub async fn patch(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    let payload: PostPatch = req.json()?;
    let post = req.db().patch_post(id, payload).await?;
    Response::json(&post)
}

/// `DELETE /api/posts/{id}` — 204, or 404 when already gone.
pub async fn remove(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    req.db().delete_post(id).await?;
    Ok(Response::no_content())
}
