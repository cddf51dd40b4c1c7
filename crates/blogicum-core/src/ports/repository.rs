use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Category, Comment, Location, Post, User};
use crate::error::RepoError;
use crate::policy::PostQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Find every entity whose ID is in `ids`. Missing IDs are skipped.
    async fn find_many(&self, ids: &[ID]) -> Result<Vec<T>, RepoError>;

    /// Store a new entity; the store assigns its ID.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, applying the store's cascades.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

pub trait LocationRepository: BaseRepository<Location, i64> {}

/// Post repository evaluating [`PostQuery`] collections.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Number of posts matching `query`.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// One page of posts matching `query`, in query order. `page_index` is
    /// zero-based.
    async fn fetch_page(
        &self,
        query: &PostQuery,
        page_index: u64,
        page_size: u64,
    ) -> Result<Vec<Post>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Comments on a post, oldest first.
    async fn for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;

    /// Live comment counts per post. Posts without comments are absent.
    async fn count_by_post(&self, post_ids: &[i64]) -> Result<HashMap<i64, u64>, RepoError>;
}

/// Every repository the blog needs, sharing one backing store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}
