//! Comment creation, editing and deletion.

use chrono::{DateTime, Utc};

use super::{BlogService, allowed};
use crate::domain::{Comment, Viewer};
use crate::error::{DomainError, RepoError};
use crate::policy::{Access, require_author, require_login};
use crate::routes;

impl BlogService {
    /// Comment on an existing post as the viewer.
    ///
    /// The post only has to exist; its visibility is not checked.
    pub async fn add_comment(
        &self,
        viewer: &Viewer,
        now: DateTime<Utc>,
        post_id: i64,
        text: String,
    ) -> Result<Access<Comment>, DomainError> {
        let author_id = allowed!(require_login(viewer, &routes::post_detail_path(post_id)));
        if self.repos.posts.find_by_id(post_id).await?.is_none() {
            return Ok(Access::NotFound);
        }

        // The post may be deleted between the lookup and the insert.
        let comment = match self
            .repos
            .comments
            .insert(Comment::new(post_id, author_id, text, now))
            .await
        {
            Ok(comment) => comment,
            Err(RepoError::Constraint(_)) => return Ok(Access::NotFound),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(comment_id = comment.id, post_id, author_id, "Comment added");

        Ok(Access::Allowed(comment))
    }

    /// The comment, if the viewer may edit it.
    pub async fn comment_for_edit(
        &self,
        viewer: &Viewer,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Access<Comment>, DomainError> {
        let next = routes::comment_edit_path(post_id, comment_id);
        self.owned_comment(viewer, post_id, comment_id, &next).await
    }

    /// The comment, if the viewer may delete it.
    pub async fn comment_for_delete(
        &self,
        viewer: &Viewer,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Access<Comment>, DomainError> {
        let next = routes::comment_delete_path(post_id, comment_id);
        self.owned_comment(viewer, post_id, comment_id, &next).await
    }

    pub async fn update_comment(
        &self,
        viewer: &Viewer,
        post_id: i64,
        comment_id: i64,
        text: String,
    ) -> Result<Access<Comment>, DomainError> {
        let mut comment = allowed!(self.comment_for_edit(viewer, post_id, comment_id).await?);

        comment.text = text;
        let comment = self.repos.comments.update(comment).await?;
        tracing::info!(comment_id, post_id, "Comment updated");

        Ok(Access::Allowed(comment))
    }

    pub async fn delete_comment(
        &self,
        viewer: &Viewer,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Access<()>, DomainError> {
        let comment = allowed!(self.comment_for_delete(viewer, post_id, comment_id).await?);

        match self.repos.comments.delete(comment.id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Ok(Access::NotFound),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(comment_id, post_id, "Comment deleted");

        Ok(Access::Allowed(()))
    }

    /// The comment must exist under this very post; only then is
    /// authorship checked.
    async fn owned_comment(
        &self,
        viewer: &Viewer,
        post_id: i64,
        comment_id: i64,
        next: &str,
    ) -> Result<Access<Comment>, DomainError> {
        let user_id = allowed!(require_login(viewer, next));
        if self.repos.posts.find_by_id(post_id).await?.is_none() {
            return Ok(Access::NotFound);
        }
        let comment = match self.repos.comments.find_by_id(comment_id).await? {
            Some(comment) if comment.post_id == post_id => comment,
            _ => return Ok(Access::NotFound),
        };

        allowed!(require_author(
            user_id,
            comment.author_id,
            routes::post_detail_path(post_id)
        ));
        Ok(Access::Allowed(comment))
    }
}
