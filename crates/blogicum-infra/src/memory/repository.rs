//! Repository ports over the in-memory tables.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::policy::PostQuery;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};

use super::records::{Record, Tables};

/// Generic in-memory repository over one table.
pub(crate) struct MemoryRepository<T> {
    tables: Arc<RwLock<Tables>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> MemoryRepository<T> {
    pub fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self {
            tables,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T, i64> for MemoryRepository<T> {
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, RepoError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).get(&id).cloned())
    }

    async fn find_many(&self, ids: &[i64]) -> Result<Vec<T>, RepoError> {
        let tables = self.tables.read().await;
        let table = T::table(&tables);
        Ok(ids.iter().filter_map(|id| table.get(id).cloned()).collect())
    }

    async fn insert(&self, mut entity: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        entity.check(&tables)?;

        let id = tables.next_id(T::TABLE);
        entity.set_id(id);
        T::table_mut(&mut tables).insert(id, entity.clone());

        tracing::debug!(table = T::TABLE, id, "Inserted row");
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        if !T::table(&tables).contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        entity.check(&tables)?;

        T::table_mut(&mut tables).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if T::table_mut(&mut tables).remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        T::on_delete(&mut tables, id);

        tracing::debug!(table = T::TABLE, id, "Deleted row");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryRepository<User> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for MemoryRepository<Category> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }
}

impl LocationRepository for MemoryRepository<Location> {}

impl MemoryRepository<Post> {
    /// Matching posts, newest publication first, ties by id.
    fn select<'a>(tables: &'a Tables, query: &PostQuery) -> Vec<&'a Post> {
        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| {
                let category = post.category_id.and_then(|id| tables.categories.get(&id));
                query.matches(post, category)
            })
            .collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(a.id.cmp(&b.id)));
        posts
    }
}

#[async_trait]
impl PostRepository for MemoryRepository<Post> {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(Self::select(&tables, query).len() as u64)
    }

    async fn fetch_page(
        &self,
        query: &PostQuery,
        page_index: u64,
        page_size: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(Self::select(&tables, query)
            .into_iter()
            .skip((page_index * page_size) as usize)
            .take(page_size as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryRepository<Comment> {
    async fn for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn count_by_post(&self, post_ids: &[i64]) -> Result<HashMap<i64, u64>, RepoError> {
        let tables = self.tables.read().await;
        let mut counts = HashMap::new();
        for comment in tables.comments.values() {
            if post_ids.contains(&comment.post_id) {
                *counts.entry(comment.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
