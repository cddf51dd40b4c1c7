//! Which posts a viewer may see.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post, Viewer};

/// Whether a post is visible to everyone at `now`.
///
/// Requires the post to be published, its publication date reached, and a
/// published category. Posts without a category are never public.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && post.pub_date <= now && category.is_some_and(|c| c.is_published)
}

/// Public visibility, except that authors always see their own posts.
pub fn can_view(
    viewer: &Viewer,
    post: &Post,
    category: Option<&Category>,
    now: DateTime<Utc>,
) -> bool {
    viewer.is(post.author_id) || is_publicly_visible(post, category, now)
}

/// Which posts a collection draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    All,
    Category(i64),
    Author(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only posts passing [`is_publicly_visible`] at `now`.
    Public { now: DateTime<Utc> },
    /// Every post in scope.
    Unrestricted,
}

/// A post collection query. Results are ordered by `pub_date` descending,
/// then by id ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub scope: PostScope,
    pub visibility: Visibility,
}

impl PostQuery {
    /// Whether `post` (with its category) belongs to the result set.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        let in_scope = match self.scope {
            PostScope::All => true,
            PostScope::Category(id) => post.category_id == Some(id),
            PostScope::Author(id) => post.author_id == id,
        };
        in_scope
            && match self.visibility {
                Visibility::Public { now } => is_publicly_visible(post, category, now),
                Visibility::Unrestricted => true,
            }
    }
}

/// The posts `viewer` may list within `scope` at `now`.
///
/// Only an author browsing their own posts skips the public filter; index
/// and category listings are public for everyone.
pub fn visible_posts(viewer: &Viewer, now: DateTime<Utc>, scope: PostScope) -> PostQuery {
    let visibility = match scope {
        PostScope::Author(author_id) if viewer.is(author_id) => Visibility::Unrestricted,
        _ => Visibility::Public { now },
    };
    PostQuery { scope, visibility }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::PostDraft;

    fn category(is_published: bool) -> Category {
        let mut category = Category::new("Travel".into(), "Trips".into(), "travel".into());
        category.id = 1;
        category.is_published = is_published;
        category
    }

    fn post(author_id: i64, pub_date: DateTime<Utc>, is_published: bool) -> Post {
        let draft = PostDraft {
            title: "Title".into(),
            text: "Text".into(),
            pub_date,
            location_id: None,
            category_id: Some(1),
            image: None,
            is_published,
        };
        let mut post = Post::new(author_id, draft, pub_date);
        post.id = 7;
        post
    }

    #[test]
    fn test_published_past_post_is_public() {
        let now = Utc::now();
        let post = post(1, now - Duration::hours(1), true);
        assert!(is_publicly_visible(&post, Some(&category(true)), now));
    }

    #[test]
    fn test_hidden_conditions() {
        let now = Utc::now();
        let cat = category(true);

        let unpublished = post(1, now - Duration::hours(1), false);
        assert!(!is_publicly_visible(&unpublished, Some(&cat), now));

        let scheduled = post(1, now + Duration::hours(1), true);
        assert!(!is_publicly_visible(&scheduled, Some(&cat), now));

        let fine = post(1, now - Duration::hours(1), true);
        assert!(!is_publicly_visible(&fine, Some(&category(false)), now));
        assert!(!is_publicly_visible(&fine, None, now));
    }

    #[test]
    fn test_pub_date_equal_to_now_is_public() {
        let now = Utc::now();
        let post = post(1, now, true);
        assert!(is_publicly_visible(&post, Some(&category(true)), now));
    }

    #[test]
    fn test_author_bypasses_every_condition() {
        let now = Utc::now();
        let post = post(5, now + Duration::days(3), false);
        let cat = category(false);

        assert!(can_view(&Viewer::User(5), &post, Some(&cat), now));
        assert!(!can_view(&Viewer::User(6), &post, Some(&cat), now));
        assert!(!can_view(&Viewer::Anonymous, &post, Some(&cat), now));
    }

    #[test]
    fn test_visible_posts_unrestricted_only_for_own_profile() {
        let now = Utc::now();

        let own = visible_posts(&Viewer::User(3), now, PostScope::Author(3));
        assert_eq!(own.visibility, Visibility::Unrestricted);

        let other = visible_posts(&Viewer::User(4), now, PostScope::Author(3));
        assert_eq!(other.visibility, Visibility::Public { now });

        let index = visible_posts(&Viewer::User(3), now, PostScope::All);
        assert_eq!(index.visibility, Visibility::Public { now });
    }

    #[test]
    fn test_query_matches_scope_and_visibility() {
        let now = Utc::now();
        let cat = category(true);
        let draft_post = post(2, now - Duration::hours(1), false);

        let public = PostQuery {
            scope: PostScope::Category(1),
            visibility: Visibility::Public { now },
        };
        assert!(!public.matches(&draft_post, Some(&cat)));

        let own = PostQuery {
            scope: PostScope::Author(2),
            visibility: Visibility::Unrestricted,
        };
        assert!(own.matches(&draft_post, Some(&cat)));

        let someone_else = PostQuery {
            scope: PostScope::Author(9),
            visibility: Visibility::Unrestricted,
        };
        assert!(!someone_else.matches(&draft_post, Some(&cat)));
    }
}
