//! Application state shared across handlers

use authd_core::config::AppConfig;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Application state shared across handlers
///
/// Holds the process-wide immutable configuration (signing secret, hashing
/// cost) and the connection pool. The auth subsystem itself keeps no other
/// cross-request mutable state.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Server start time
    pub start_time: Instant,
    /// Ready status
    pub is_ready: AtomicBool,
}

impl AppState {
    /// Create new application state with config and connection pool
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        Self {
            config,
            pool,
            start_time: Instant::now(),
            is_ready: AtomicBool::new(true),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if service is ready
    pub fn is_ready(&self) -> bool {
        self.is_ready.load(Ordering::SeqCst)
    }

    /// Set ready status
    pub fn set_ready(&self, ready: bool) {
        self.is_ready.store(ready, Ordering::SeqCst);
    }
}
