//! Business logic services

pub mod catalog;

use std::sync::Arc;

use crate::repository::BookStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::BookCatalogService,
}

impl Services {
    /// Create all services over the given book store
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            catalog: catalog::BookCatalogService::new(store),
        }
    }
}
