//! SIMPANSE asset loan server
//!
//! Borrowers request items from a shared catalog; staff verify, approve and
//! close those requests while item availability follows along. State lives in
//! memory and is snapshotted to a key/value store.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
