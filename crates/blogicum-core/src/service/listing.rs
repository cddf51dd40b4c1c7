//! List assembler: filtered, paginated, annotated post collections.

use chrono::{DateTime, Utc};

use super::{BlogService, by_id, distinct};
use crate::domain::{AuthorSummary, CategoryPage, Post, PostCard, ProfilePage, Viewer};
use crate::error::{DomainError, RepoError};
use crate::pagination::{POSTS_PER_PAGE, Page, resolve_page};
use crate::policy::{Access, PostQuery, PostScope, visible_posts};

impl BlogService {
    /// Front page: every publicly visible post, newest first.
    pub async fn index(
        &self,
        viewer: &Viewer,
        now: DateTime<Utc>,
        page: Option<&str>,
    ) -> Result<Page<PostCard>, DomainError> {
        let query = visible_posts(viewer, now, PostScope::All);
        Ok(self.assemble(&query, page).await?)
    }

    /// Posts of one published category. Unknown and hidden categories are
    /// both not found.
    pub async fn category_posts(
        &self,
        viewer: &Viewer,
        now: DateTime<Utc>,
        slug: &str,
        page: Option<&str>,
    ) -> Result<Access<CategoryPage>, DomainError> {
        let category = match self.repos.categories.find_by_slug(slug).await? {
            Some(category) if category.is_published => category,
            _ => return Ok(Access::NotFound),
        };

        let query = visible_posts(viewer, now, PostScope::Category(category.id));
        let page = self.assemble(&query, page).await?;
        Ok(Access::Allowed(CategoryPage { category, page }))
    }

    /// A user's posts. The owner sees all of them, everyone else only the
    /// public ones.
    pub async fn profile(
        &self,
        viewer: &Viewer,
        now: DateTime<Utc>,
        username: &str,
        page: Option<&str>,
    ) -> Result<Access<ProfilePage>, DomainError> {
        let Some(user) = self.repos.users.find_by_username(username).await? else {
            return Ok(Access::NotFound);
        };

        let query = visible_posts(viewer, now, PostScope::Author(user.id));
        let page = self.assemble(&query, page).await?;
        Ok(Access::Allowed(ProfilePage {
            profile: AuthorSummary::from(&user),
            is_owner: viewer.is(user.id),
            page,
        }))
    }

    async fn assemble(
        &self,
        query: &PostQuery,
        raw_page: Option<&str>,
    ) -> Result<Page<PostCard>, RepoError> {
        let count = self.repos.posts.count(query).await?;
        let number = resolve_page(raw_page, count, POSTS_PER_PAGE);
        let posts = self
            .repos
            .posts
            .fetch_page(query, number - 1, POSTS_PER_PAGE)
            .await?;

        tracing::debug!(?query, count, page = number, "Assembled post page");

        let cards = self.cards(posts).await?;
        Ok(Page::new(cards, number, count, POSTS_PER_PAGE))
    }

    /// Attach author, category, published location and comment count.
    pub(super) async fn cards(&self, posts: Vec<Post>) -> Result<Vec<PostCard>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let author_ids = distinct(posts.iter().map(|p| p.author_id));
        let category_ids = distinct(posts.iter().filter_map(|p| p.category_id));
        let location_ids = distinct(posts.iter().filter_map(|p| p.location_id));

        let authors = by_id(self.repos.users.find_many(&author_ids).await?, |u| u.id);
        let categories = by_id(
            self.repos.categories.find_many(&category_ids).await?,
            |c| c.id,
        );
        let locations = by_id(self.repos.locations.find_many(&location_ids).await?, |l| l.id);
        let counts = self.repos.comments.count_by_post(&post_ids).await?;

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).ok_or_else(|| {
                    RepoError::Constraint(format!("post {} has no author", post.id))
                })?;
                Ok(PostCard {
                    author: AuthorSummary::from(author),
                    category: post.category_id.and_then(|id| categories.get(&id).cloned()),
                    location: post
                        .location_id
                        .and_then(|id| locations.get(&id))
                        .filter(|l| l.is_published)
                        .cloned(),
                    comment_count: counts.get(&post.id).copied().unwrap_or(0),
                    post,
                })
            })
            .collect()
    }
}
