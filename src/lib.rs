//! Bookshelf
//!
//! A REST JSON API over a catalog of books: paginated listing, rating
//! updates, deletion and creation, backed by an injected book store.

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

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn repository::BookStore>) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(store)),
        }
    }
}
