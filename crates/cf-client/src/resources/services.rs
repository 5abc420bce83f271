use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{Paged, Resource, ServiceEntity};

/// Largest page the Cloud Controller serves.
pub const SERVICES_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct Services {
    handle: ApiHandle,
}

impl Services {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<ServiceEntity>, CfError> {
        self.handle.get_json("/v2/services", query).await
    }

    /// One page of the marketplace, 1-based.
    pub async fn page(&self, page: u32, per_page: u32) -> Result<Paged<ServiceEntity>, CfError> {
        let query = ListQuery::new().results_per_page(per_page).page(page);
        self.list(&query).await
    }

    pub async fn get(&self, guid: &str) -> Result<Resource<ServiceEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/services/{}", guid), &ListQuery::new())
            .await
    }
}
