use std::sync::Arc;

use reviewer_core::store::RedbStore;
use reviewer_core::ReviewService;

pub type Service = ReviewService<RedbStore>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
}

impl AppState {
    pub fn new(service: Service) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
