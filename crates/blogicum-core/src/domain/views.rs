//! Read models handed to the presentation layer.

use serde::Serialize;

use super::{Category, Comment, Location, Post, User};
use crate::pagination::Page;

/// Public face of a user, attached to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// A post with its related entities and live comment count.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub post: Post,
    pub author: AuthorSummary,
    pub category: Option<Category>,
    /// Only present when the location itself is published.
    pub location: Option<Location>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment: Comment,
    pub author: AuthorSummary,
}

/// Single post page: the post and its comments, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub card: PostCard,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPage {
    pub category: Category,
    pub page: Page<PostCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub profile: AuthorSummary,
    /// Whether the viewer is looking at their own profile.
    pub is_owner: bool,
    pub page: Page<PostCard>,
}
