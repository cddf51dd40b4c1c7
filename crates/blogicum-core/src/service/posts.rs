//! Post detail, creation, editing and deletion.

use chrono::{DateTime, Utc};

use super::{BlogService, allowed, by_id, distinct};
use crate::domain::{AuthorSummary, CommentView, Post, PostCard, PostDetail, PostDraft, Viewer};
use crate::error::{DomainError, FieldErrors, RepoError};
use crate::policy::{Access, can_view, require_author, require_login};
use crate::routes;

impl BlogService {
    /// A single post with its comments.
    ///
    /// Non-authors get `NotFound` for posts that are not publicly visible.
    pub async fn post_detail(
        &self,
        viewer: &Viewer,
        now: DateTime<Utc>,
        post_id: i64,
    ) -> Result<Access<PostDetail>, DomainError> {
        let Some(post) = self.repos.posts.find_by_id(post_id).await? else {
            return Ok(Access::NotFound);
        };

        let category = match post.category_id {
            Some(id) => self.repos.categories.find_by_id(id).await?,
            None => None,
        };
        if !can_view(viewer, &post, category.as_ref(), now) {
            return Ok(Access::NotFound);
        }

        let card = self.single_card(post).await?;
        let comments = self.comment_views(card.post.id).await?;
        Ok(Access::Allowed(PostDetail { card, comments }))
    }

    /// Gate for the blank creation form.
    pub fn new_post_form(&self, viewer: &Viewer) -> Access<i64> {
        require_login(viewer, &routes::post_create_path())
    }

    /// Publish a new post authored by the viewer.
    pub async fn create_post(
        &self,
        viewer: &Viewer,
        now: DateTime<Utc>,
        draft: PostDraft,
    ) -> Result<Access<PostCard>, DomainError> {
        let author_id = allowed!(self.new_post_form(viewer));
        self.check_references(&draft).await?;

        let post = self.repos.posts.insert(Post::new(author_id, draft, now)).await?;
        tracing::info!(post_id = post.id, author_id, "Post created");

        Ok(Access::Allowed(self.single_card(post).await?))
    }

    /// The post, if the viewer may edit it.
    pub async fn post_for_edit(
        &self,
        viewer: &Viewer,
        post_id: i64,
    ) -> Result<Access<Post>, DomainError> {
        self.owned_post(viewer, post_id, &routes::post_edit_path(post_id))
            .await
    }

    /// The post, if the viewer may delete it.
    pub async fn post_for_delete(
        &self,
        viewer: &Viewer,
        post_id: i64,
    ) -> Result<Access<Post>, DomainError> {
        self.owned_post(viewer, post_id, &routes::post_delete_path(post_id))
            .await
    }

    pub async fn update_post(
        &self,
        viewer: &Viewer,
        post_id: i64,
        draft: PostDraft,
    ) -> Result<Access<Post>, DomainError> {
        let mut post = allowed!(self.post_for_edit(viewer, post_id).await?);
        self.check_references(&draft).await?;

        draft.apply_to(&mut post);
        let post = self.repos.posts.update(post).await?;
        tracing::info!(post_id, author_id = post.author_id, "Post updated");

        Ok(Access::Allowed(post))
    }

    /// Delete the post together with its comments.
    pub async fn delete_post(
        &self,
        viewer: &Viewer,
        post_id: i64,
    ) -> Result<Access<()>, DomainError> {
        let post = allowed!(self.post_for_delete(viewer, post_id).await?);

        match self.repos.posts.delete(post.id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Ok(Access::NotFound),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(post_id, author_id = post.author_id, "Post deleted");

        Ok(Access::Allowed(()))
    }

    /// Login, existence, then authorship, in that order.
    async fn owned_post(
        &self,
        viewer: &Viewer,
        post_id: i64,
        next: &str,
    ) -> Result<Access<Post>, DomainError> {
        let user_id = allowed!(require_login(viewer, next));
        let Some(post) = self.repos.posts.find_by_id(post_id).await? else {
            return Ok(Access::NotFound);
        };
        allowed!(require_author(
            user_id,
            post.author_id,
            routes::post_detail_path(post_id)
        ));
        Ok(Access::Allowed(post))
    }

    /// The draft's category must exist, and so must its location if set.
    async fn check_references(&self, draft: &PostDraft) -> Result<(), DomainError> {
        let mut errors = FieldErrors::new();

        match draft.category_id {
            None => {
                errors.insert("category".into(), vec!["This field is required.".into()]);
            }
            Some(id) => {
                if self.repos.categories.find_by_id(id).await?.is_none() {
                    errors.insert("category".into(), vec![unknown_choice()]);
                }
            }
        }
        if let Some(id) = draft.location_id {
            if self.repos.locations.find_by_id(id).await?.is_none() {
                errors.insert("location".into(), vec![unknown_choice()]);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors))
        }
    }

    async fn single_card(&self, post: Post) -> Result<PostCard, RepoError> {
        let post_id = post.id;
        self.cards(vec![post])
            .await?
            .pop()
            .ok_or_else(|| RepoError::Query(format!("post {post_id} vanished while loading")))
    }

    /// Comments on a post with their authors, oldest first.
    pub(super) async fn comment_views(&self, post_id: i64) -> Result<Vec<CommentView>, RepoError> {
        let comments = self.repos.comments.for_post(post_id).await?;
        let author_ids = distinct(comments.iter().map(|c| c.author_id));
        let authors = by_id(self.repos.users.find_many(&author_ids).await?, |u| u.id);

        Ok(comments
            .into_iter()
            .filter_map(|comment| {
                let author = AuthorSummary::from(authors.get(&comment.author_id)?);
                Some(CommentView { comment, author })
            })
            .collect())
    }
}

fn unknown_choice() -> String {
    "Select a valid choice. That choice is not one of the available choices.".to_string()
}
