use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{Paged, Resource, ServiceInstanceEntity};

#[derive(Debug, Clone)]
pub struct ServiceInstances {
    handle: ApiHandle,
}

impl ServiceInstances {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<ServiceInstanceEntity>, CfError> {
        self.handle.get_json("/v2/service_instances", query).await
    }

    pub async fn get(&self, guid: &str) -> Result<Resource<ServiceInstanceEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/service_instances/{}", guid), &ListQuery::new())
            .await
    }
}
