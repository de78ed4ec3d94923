//! `/api/users` handlers.

use crate::error::Error;
use crate::models::{NewUser, UserPatch};
use crate::request::Request;
use crate::response::Response;

/// `GET /api/users`
pub async fn index(req: Request) -> Result<Response, Error> {
    let users = req.db().users().await;
    Response::json(&users)
}

/// `GET /api/users/{id}`
pub async fn show(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    let user = req.db().user(id).await?;
    Response::json(&user)
}

/// `GET /api/users/{id}/posts` — 404 when the user is missing, an empty
/// list when they simply have no posts.
pub async fn posts(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    let posts = req.db().posts_by_user(id).await?;
    Response::json(&posts)
}

/// `POST /api/users` — 201, or 400 on a username/email collision.
pub async fn create(req: Request) -> Result<Response, Error> {
    let payload: NewUser = req.json()?;
    let user = req.db().create_user(payload).await?;
    Response::created(&user)
}

/// `PATCH /api/users/{id}`
pub async fn patch(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    let payload: UserPatch = req.json()?;
    let user = req.db().update_user(id, payload).await?;
    Response::json(&user)
}

/// `DELETE /api/users/{id}` — 204, or 404 when already gone.
pub async fn remove(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    req.db().delete_user(id).await?;
    Ok(Response::no_content())
}
