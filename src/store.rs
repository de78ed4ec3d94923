//! The entity store: users and posts behind one lock.
//!
//! [`Db`] is the exclusive owner of both tables. Every operation acquires
//! the `RwLock` guard exactly once and holds it for the whole operation,
//! so a validate-then-mutate sequence can never interleave with a
//! concurrent write — the check-then-insert race a SQL backend would leave
//! to its unique constraints does not exist here. The guard is released on
//! every exit path when it drops.
//!
//! Read-only lookups and uniqueness checks live on [`Tables`]; the public
//! CRUD operations on [`Db`] compose them under a single guard.

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::Error;
use crate::models::{NewPost, NewUser, Post, PostPatch, PostReplace, User, UserPatch, DEFAULT_IMAGE};

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

fn post_not_found() -> Error {
    Error::not_found("Post not found")
}

#[derive(Debug)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
    next_user_id: i64,
    next_post_id: i64,
}

impl Tables {
    fn new() -> Self {
        Self {
            users: Vec::new(),
            posts: Vec::new(),
            next_user_id: 1,
            next_post_id: 1,
        }
    }

    fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn post(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// `exclude` skips one row so an update to an unchanged value never
    /// collides with itself.
    fn username_taken(&self, value: &str, exclude: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| u.username == value && Some(u.id) != exclude)
    }

    fn email_taken(&self, value: &str, exclude: Option<i64>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == value && Some(u.id) != exclude)
    }
}

/// The blog's only shared state.
#[derive(Debug)]
pub struct Db {
    inner: RwLock<Tables>,
}

impl Db {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables::new()),
        }
    }

    /// Creates a user after the uniqueness checks pass.
    ///
    /// Username is checked before email, so when both collide the reported
    /// conflict is always the username.
    pub async fn create_user(&self, new: NewUser) -> Result<User, Error> {
        let mut t = self.inner.write().await;
        if t.username_taken(&new.username, None) {
            return Err(Error::conflict("Username already exists."));
        }
        if t.email_taken(&new.email, None) {
            return Err(Error::conflict("Email already exists."));
        }
        let user = User {
            id: t.next_user_id,
            username: new.username,
            email: new.email,
            image_file: new.image_file.unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
        };
        t.next_user_id += 1;
        t.users.push(user.clone());
        Ok(user)
    }

    pub async fn user(&self, id: i64) -> Result<User, Error> {
        let t = self.inner.read().await;
        t.user(id).cloned().ok_or_else(user_not_found)
    }

    /// All users in insertion order.
    pub async fn users(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    /// Applies the fields present in `patch`, validating every supplied
    /// field before touching the row — a failing field aborts the whole
    /// update with nothing applied.
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, Error> {
        let mut t = self.inner.write().await;
        let Some(idx) = t.users.iter().position(|u| u.id == id) else {
            return Err(user_not_found());
        };
        if let Some(username) = &patch.username {
            if *username != t.users[idx].username && t.username_taken(username, Some(id)) {
                return Err(Error::conflict("Username already exists"));
            }
        }
        if let Some(email) = &patch.email {
            if *email != t.users[idx].email && t.email_taken(email, Some(id)) {
                return Err(Error::conflict("Email already registered"));
            }
        }
        let user = &mut t.users[idx];
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(image_file) = patch.image_file {
            user.image_file = image_file;
        }
        Ok(user.clone())
    }

    /// Removes the user and, in the same critical section, every post they
    /// authored. No row may ever hold a `user_id` that resolves to nothing.
    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        let mut t = self.inner.write().await;
        let Some(idx) = t.users.iter().position(|u| u.id == id) else {
            return Err(user_not_found());
        };
        t.users.remove(idx);
        t.posts.retain(|p| p.user_id != id);
        Ok(())
    }

    /// Creates a post. The owner must exist; otherwise nothing is persisted.
    pub async fn create_post(&self, new: NewPost) -> Result<Post, Error> {
        let mut t = self.inner.write().await;
        if t.user(new.user_id).is_none() {
            return Err(user_not_found());
        }
        let post = Post {
            id: t.next_post_id,
            title: new.title,
            content: new.content,
            date_posted: Utc::now(),
            user_id: new.user_id,
        };
        t.next_post_id += 1;
        t.posts.push(post.clone());
        Ok(post)
    }

    pub async fn post(&self, id: i64) -> Result<Post, Error> {
        let t = self.inner.read().await;
        t.post(id).cloned().ok_or_else(post_not_found)
    }

    /// All posts in insertion order.
    pub async fn posts(&self) -> Vec<Post> {
        self.inner.read().await.posts.clone()
    }

    /// All posts, newest first. Used by the HTML listings.
    pub async fn recent_posts(&self) -> Vec<Post> {
        let mut posts = self.inner.read().await.posts.clone();
        sort_newest_first(&mut posts);
        posts
    }

    /// Posts by one author, newest first.
    ///
    /// Fails with `NotFound` when the user does not exist; an existing user
    /// with zero posts is an empty result, not an error.
    pub async fn posts_by_user(&self, user_id: i64) -> Result<Vec<Post>, Error> {
        let t = self.inner.read().await;
        if t.user(user_id).is_none() {
            return Err(user_not_found());
        }
        let mut posts: Vec<Post> = t
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    /// Full replace: every mutable field takes the payload's value.
    /// `date_posted` is server-owned and survives unchanged. A changed
    /// `user_id` is validated against the user table first.
    pub async fn replace_post(&self, id: i64, payload: PostReplace) -> Result<Post, Error> {
        let mut t = self.inner.write().await;
        let Some(idx) = t.posts.iter().position(|p| p.id == id) else {
            return Err(post_not_found());
        };
        if payload.user_id != t.posts[idx].user_id && t.user(payload.user_id).is_none() {
            return Err(user_not_found());
        }
        let post = &mut t.posts[idx];
        post.title = payload.title;
        post.content = payload.content;
        post.user_id = payload.user_id;
        Ok(post.clone())
    }

    /// Applies only the fields present in `patch`; a changed `user_id` must
    /// resolve to an existing user before anything is applied.
    pub async fn patch_post(&self, id: i64, patch: PostPatch) -> Result<Post, Error> {
        let mut t = self.inner.write().await;
        let Some(idx) = t.posts.iter().position(|p| p.id == id) else {
            return Err(post_not_found());
        };
        if let Some(user_id) = patch.user_id {
            if user_id != t.posts[idx].user_id && t.user(user_id).is_none() {
                return Err(user_not_found());
            }
        }
        let post = &mut t.posts[idx];
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(user_id) = patch.user_id {
            post.user_id = user_id;
        }
        Ok(post.clone())
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), Error> {
        let mut t = self.inner.write().await;
        let Some(idx) = t.posts.iter().position(|p| p.id == id) else {
            return Err(post_not_found());
        };
        t.posts.remove(idx);
        Ok(())
    }
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}

/// `date_posted` descending; ties broken by id descending so the order is
/// deterministic even when two posts land on the same timestamp.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.date_posted
            .cmp(&a.date_posted)
            .then_with(|| b.id.cmp(&a.id))
    });
}
