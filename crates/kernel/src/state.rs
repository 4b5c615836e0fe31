//! Application state shared across all handlers.
//!
//! Everything request handlers need flows through this struct — there
//! are no process-wide singletons. Initialized once at startup, dropped
//! at shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::Config;
use crate::db;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Loaded configuration.
    config: Config,
}

impl AppState {
    /// Connect to the database, bootstrap the schema, and build the state.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::init_schema(&pool)
            .await
            .context("failed to initialize schema")?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                db: pool,
                config: config.clone(),
            }),
        })
    }

    /// The database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// The loaded configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Probe database reachability.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
