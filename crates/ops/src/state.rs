//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::OpsConfig;
use crate::services::ImageResolver;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: OpsConfig,
    pool: PgPool,
    images: ImageResolver,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: OpsConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images: ImageResolver::new(),
            }),
        }
    }

    /// Get a reference to the ops configuration.
    #[must_use]
    pub fn config(&self) -> &OpsConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the cached image resolver.
    #[must_use]
    pub fn images(&self) -> &ImageResolver {
        &self.inner.images
    }
}
