use std::sync::Arc;

use crate::error::Result;
use crate::models::application::Application;
use crate::services::application_store::ApplicationStore;

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ApplicationStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn ApplicationStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Application>> {
        self.store.list_all().await
    }
}
