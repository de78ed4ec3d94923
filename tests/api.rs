//! End-to-end tests: every request goes through the router, the handlers,
//! and the error normalizer, exactly as it would over the wire.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, StatusCode};
use serde_json::{json, Value};

use quill::{routes, Db, Response, Router};

struct App {
    router: Router,
    db: Arc<Db>,
}

impl App {
    fn new() -> Self {
        Self {
            router: routes(),
            db: Arc::new(Db::new()),
        }
    }

    async fn send(&self, method: Method, path: &str, body: &str) -> Response {
        self.router
            .respond(
                method,
                path,
                Bytes::from(body.to_owned()),
                Arc::clone(&self.db),
            )
            .await
    }

    async fn get(&self, path: &str) -> Response {
        self.send(Method::GET, path, "").await
    }

    async fn create_user(&self, username: &str, email: &str) -> Response {
        self.send(
            Method::POST,
            "/api/users",
            &json!({ "username": username, "email": email }).to_string(),
        )
        .await
    }

    async fn create_post(&self, title: &str, user_id: i64) -> Response {
        self.send(
            Method::POST,
            "/api/posts",
            &json!({ "title": title, "content": "body", "user_id": user_id }).to_string(),
        )
        .await
    }
}

fn body_json(resp: &Response) -> Value {
    serde_json::from_slice(resp.body()).expect("response body is JSON")
}

fn body_text(resp: &Response) -> String {
    String::from_utf8(resp.body().to_vec()).expect("response body is UTF-8")
}

#[tokio::test]
async fn user_create_then_fetch_round_trips() {
    let app = App::new();

    let resp = app.create_user("amy", "amy@x.com").await;
    assert_eq!(resp.status_code(), StatusCode::CREATED);
    let created = body_json(&resp);
    assert_eq!(created["id"], 1);
    assert_eq!(created["username"], "amy");
    assert_eq!(created["image_file"], "default.jpg");

    let resp = app.get("/api/users/1").await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(body_json(&resp), created);
}

#[tokio::test]
async fn duplicate_user_reports_username_first() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;

    // identical payload: both fields collide, username wins
    let resp = app.create_user("amy", "amy@x.com").await;
    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(&resp), json!({ "detail": "Username already exists." }));

    let resp = app.create_user("bob", "amy@x.com").await;
    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(&resp), json!({ "detail": "Email already exists." }));
}

#[tokio::test]
async fn user_patch_is_all_or_nothing() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;
    app.create_user("bob", "bob@x.com").await;

    // the username change alone would be fine; the colliding email must
    // drag the whole patch down
    let resp = app
        .send(
            Method::PATCH,
            "/api/users/2",
            &json!({ "username": "robert", "email": "amy@x.com" }).to_string(),
        )
        .await;
    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(&resp), json!({ "detail": "Email already registered" }));

    let bob = body_json(&app.get("/api/users/2").await);
    assert_eq!(bob["username"], "bob");
    assert_eq!(bob["email"], "bob@x.com");
}

#[tokio::test]
async fn user_patch_applies_only_supplied_fields() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;

    let resp = app
        .send(
            Method::PATCH,
            "/api/users/1",
            &json!({ "username": "amelia" }).to_string(),
        )
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let amy = body_json(&resp);
    assert_eq!(amy["username"], "amelia");
    assert_eq!(amy["email"], "amy@x.com");
}

#[tokio::test]
async fn patching_a_missing_user_is_404() {
    let app = App::new();
    let resp = app
        .send(
            Method::PATCH,
            "/api/users/9",
            &json!({ "username": "ghost" }).to_string(),
        )
        .await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&resp), json!({ "detail": "User not found" }));
}

#[tokio::test]
async fn user_posts_empty_list_is_not_an_error() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;

    let resp = app.get("/api/users/1/posts").await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(body_json(&resp), json!([]));

    let resp = app.get("/api/users/99/posts").await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&resp), json!({ "detail": "User not found" }));
}

#[tokio::test]
async fn post_with_missing_owner_is_404_and_not_persisted() {
    let app = App::new();

    let resp = app.create_post("orphan", 7).await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(&resp), json!({ "detail": "User not found" }));

    assert_eq!(body_json(&app.get("/api/posts").await), json!([]));
}

#[tokio::test]
async fn post_crud_lifecycle() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;

    let resp = app.create_post("Draft", 1).await;
    assert_eq!(resp.status_code(), StatusCode::CREATED);
    let created = body_json(&resp);
    assert_eq!(created["id"], 1);
    assert!(created["date_posted"].is_string());

    // full replace
    let resp = app
        .send(
            Method::PUT,
            "/api/posts/1",
            &json!({ "title": "Final", "content": "rewritten", "user_id": 1 }).to_string(),
        )
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let replaced = body_json(&resp);
    assert_eq!(replaced["title"], "Final");
    assert_eq!(replaced["date_posted"], created["date_posted"]);

    // replace with a non-existent new owner
    let resp = app
        .send(
            Method::PUT,
            "/api/posts/1",
            &json!({ "title": "x", "content": "y", "user_id": 42 }).to_string(),
        )
        .await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);

    let resp = app.send(Method::DELETE, "/api/posts/1", "").await;
    assert_eq!(resp.status_code(), StatusCode::NO_CONTENT);
    assert!(resp.body().is_empty());

    let resp = app.send(Method::DELETE, "/api/posts/1", "").await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_patch_leaves_other_fields_alone() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;
    app.create_post("Draft", 1).await;

    let resp = app
        .send(
            Method::PATCH,
            "/api/posts/1",
            &json!({ "title": "New" }).to_string(),
        )
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let patched = body_json(&resp);
    assert_eq!(patched["title"], "New");
    assert_eq!(patched["content"], "body");
    assert_eq!(patched["user_id"], 1);
}

#[tokio::test]
async fn deleting_a_user_cascades_to_their_posts() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;
    app.create_user("bob", "bob@x.com").await;
    app.create_post("amy's", 1).await;
    app.create_post("bob's", 2).await;

    let resp = app.send(Method::DELETE, "/api/users/1", "").await;
    assert_eq!(resp.status_code(), StatusCode::NO_CONTENT);

    let posts = body_json(&app.get("/api/posts").await);
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["user_id"], 2);

    // missing on delete is 404, never 204
    let resp = app.send(Method::DELETE, "/api/users/1", "").await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_is_422_with_field_errors() {
    let app = App::new();
    let resp = app.get("/api/posts/abc").await;
    assert_eq!(resp.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(&resp);
    assert!(body["detail"].is_array());
    assert_eq!(body["detail"][0]["field"], "id");
}

#[tokio::test]
async fn malformed_body_is_422_with_field_errors() {
    let app = App::new();
    let resp = app.send(Method::POST, "/api/users", "{not json").await;
    assert_eq!(resp.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(&resp)["detail"].is_array());
}

#[tokio::test]
async fn unknown_api_route_is_json_404() {
    let app = App::new();
    let resp = app.get("/api/nothing/here").await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(resp.header("content-type"), Some("application/json"));
    assert_eq!(body_json(&resp), json!({ "detail": "Not Found" }));
}

#[tokio::test]
async fn missing_page_renders_an_html_404() {
    let app = App::new();
    let resp = app.get("/posts/42").await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(resp.header("content-type"), Some("text/html; charset=utf-8"));
    let body = body_text(&resp);
    assert!(body.contains("<title>404</title>"));
    assert!(body.contains("Post not found"));
}

#[tokio::test]
async fn listing_pages_render_posts_newest_first() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;
    app.create_post("First post", 1).await;
    app.create_post("Second post", 1).await;

    for path in ["/", "/posts", "/users/1/posts"] {
        let resp = app.get(path).await;
        assert_eq!(resp.status_code(), StatusCode::OK, "path {path}");
        let body = body_text(&resp);
        let first = body.find("First post").unwrap();
        let second = body.find("Second post").unwrap();
        assert!(second < first, "newest first on {path}");
    }
}

#[tokio::test]
async fn detail_page_truncates_long_titles() {
    let app = App::new();
    app.create_user("amy", "amy@x.com").await;
    let title = "t".repeat(80);
    app.create_post(&title, 1).await;

    let body = body_text(&app.get("/posts/1").await);
    assert!(body.contains(&"t".repeat(50)));
    assert!(!body.contains(&title));

    // the API keeps the full title
    let post = body_json(&app.get("/api/posts/1").await);
    assert_eq!(post["title"].as_str().unwrap().len(), 80);
}

#[tokio::test]
async fn pages_for_a_missing_author_render_404() {
    let app = App::new();
    let resp = app.get("/users/9/posts").await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert!(body_text(&resp).contains("User not found"));
}
