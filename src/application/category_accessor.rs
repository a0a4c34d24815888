// src/application/category_accessor.rs
use crate::application::fetch_client::{FetchClient, HttpTransport, Scheduler};
use crate::constants::CATEGORIES_ENDPOINT;
use crate::domain::{CategoryIndex, FetchError};
use tracing::{info, warn};

pub struct CategoryAccessor<'a, T: HttpTransport, S: Scheduler> {
    client: &'a FetchClient<T, S>,
}

impl<'a, T: HttpTransport, S: Scheduler> CategoryAccessor<'a, T, S> {
    pub fn new(client: &'a FetchClient<T, S>) -> Self {
        Self { client }
    }

    /// Fetch the language index grouped by region
    pub async fn list_categories(&self) -> Result<CategoryIndex, FetchError> {
        let index: CategoryIndex = self.client.fetch_resource(CATEGORIES_ENDPOINT).await?;

        let duplicates = index.duplicate_codes();
        if !duplicates.is_empty() {
            warn!(?duplicates, "Language codes listed more than once; progress for them is shared");
        }

        info!(regions = index.regions.len(), "Loaded categories");
        Ok(index)
    }
}
