use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{Paged, Resource, ServiceBindingEntity};

#[derive(Debug, Clone)]
pub struct ServiceBindings {
    handle: ApiHandle,
}

impl ServiceBindings {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<ServiceBindingEntity>, CfError> {
        self.handle.get_json("/v2/service_bindings", query).await
    }

    pub async fn get(&self, guid: &str) -> Result<Resource<ServiceBindingEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/service_bindings/{}", guid), &ListQuery::new())
            .await
    }

    pub async fn for_app(&self, app_guid: &str) -> Result<Paged<ServiceBindingEntity>, CfError> {
        self.list(&ListQuery::new().filter("app_guid", app_guid))
            .await
    }
}
