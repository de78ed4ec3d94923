//! Server-rendered HTML pages.
//!
//! The same data the API serves, wrapped in a minimal hand-rolled layout.
//! No template engine: the pages carry presentation only, and a shared
//! `layout` plus text escaping covers them.

use http::StatusCode;

use crate::error::Error;
use crate::models::Post;
use crate::request::Request;
use crate::response::Response;

/// The single-post view shows at most this many characters of the title.
const TITLE_DISPLAY_LIMIT: usize = 50;

/// `GET /`
pub async fn home(req: Request) -> Result<Response, Error> {
    post_index(req).await
}

/// `GET /posts` — all posts, newest first.
pub async fn post_index(req: Request) -> Result<Response, Error> {
    let posts = req.db().recent_posts().await;
    Ok(Response::html(listing_page("Latest posts", &posts)))
}

/// `GET /posts/{id}` — one post, 404 page when missing.
pub async fn post_detail(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    let post = req.db().post(id).await?;
    Ok(Response::html(detail_page(&post)))
}

/// `GET /users/{id}/posts` — one author's posts, 404 page when the user is
/// missing.
pub async fn user_posts(req: Request) -> Result<Response, Error> {
    let id = req.param_id("id")?;
    let user = req.db().user(id).await?;
    let posts = req.db().posts_by_user(id).await?;
    let heading = format!("Posts by {}", user.username);
    Ok(Response::html(listing_page(&heading, &posts)))
}

/// The HTML half of the error normalizer: status code as the title, the
/// message in the body, a generic fallback when there is none.
pub(crate) fn error_page(status: StatusCode, message: &str) -> Response {
    let code = status.as_u16().to_string();
    let message = if message.is_empty() {
        "Something went wrong"
    } else {
        message
    };
    let body = format!("<h1>{code}</h1>\n<p>{}</p>", escape(message));
    Response::builder()
        .status(status)
        .html(layout(&code, &body))
}

/// Truncates a title for display: first [`TITLE_DISPLAY_LIMIT`] characters,
/// no ellipsis. Characters, not bytes — multibyte titles must not be cut
/// mid-scalar.
fn display_title(title: &str) -> String {
    title.chars().take(TITLE_DISPLAY_LIMIT).collect()
}

fn listing_page(heading: &str, posts: &[Post]) -> String {
    let mut items = String::new();
    for post in posts {
        items.push_str(&format!(
            "<li><a href=\"/posts/{}\">{}</a> <small>{}</small></li>\n",
            post.id,
            escape(&post.title),
            post.date_posted.format("%Y-%m-%d"),
        ));
    }
    let body = format!("<h1>{}</h1>\n<ul>\n{items}</ul>", escape(heading));
    layout(heading, &body)
}

fn detail_page(post: &Post) -> String {
    let title = display_title(&post.title);
    let body = format!(
        "<h1>{}</h1>\n<p><small>posted {} · <a href=\"/users/{}/posts\">author</a></small></p>\n<div>{}</div>",
        escape(&title),
        post.date_posted.format("%Y-%m-%d %H:%M"),
        post.user_id,
        escape(&post.content),
    );
    layout(&title, &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
