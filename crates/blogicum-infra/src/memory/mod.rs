//! In-memory store - used when no database is configured, and in tests.

mod records;
mod repository;

use std::sync::Arc;

use tokio::sync::RwLock;

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::ports::Repositories;

use records::Tables;
use repository::MemoryRepository;

/// A whole blog database held in memory.
///
/// Enforces the same unique keys, foreign keys and cascades as the
/// PostgreSQL schema. Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositories sharing this store.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(MemoryRepository::<User>::new(self.tables.clone())),
            categories: Arc::new(MemoryRepository::<Category>::new(self.tables.clone())),
            locations: Arc::new(MemoryRepository::<Location>::new(self.tables.clone())),
            posts: Arc::new(MemoryRepository::<Post>::new(self.tables.clone())),
            comments: Arc::new(MemoryRepository::<Comment>::new(self.tables.clone())),
        }
    }
}
