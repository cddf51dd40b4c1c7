//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::BlogService;
use blogicum_infra::{DatabaseConfig, DatabaseConnections, InMemoryStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the state on PostgreSQL when configured and reachable,
    /// otherwise on the in-memory store.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(config) = db_config {
            match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let repos = blogicum_infra::postgres_repositories(connections.main.clone());
                    tracing::info!("Application state initialized (postgres)");
                    return Self {
                        blog: BlogService::new(repos),
                        db: Some(Arc::new(connections)),
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        if db_config.is_some() {
            tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
        }

        let state = Self::in_memory(InMemoryStore::new());
        tracing::info!("Application state initialized (in-memory)");
        state
    }

    /// State backed by the given in-memory store.
    pub fn in_memory(store: InMemoryStore) -> Self {
        Self {
            blog: BlogService::new(store.repositories()),
            db: None,
        }
    }
}
