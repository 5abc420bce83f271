use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{AppEntity, Paged, Resource, RouteEntity};

#[derive(Debug, Clone)]
pub struct Routes {
    handle: ApiHandle,
}

impl Routes {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<RouteEntity>, CfError> {
        self.handle.get_json("/v2/routes", query).await
    }

    pub async fn get(&self, guid: &str) -> Result<Resource<RouteEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/routes/{}", guid), &ListQuery::new())
            .await
    }

    /// Apps mapped to a route.
    pub async fn apps(&self, guid: &str) -> Result<Paged<AppEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/routes/{}/apps", guid), &ListQuery::new())
            .await
    }
}
