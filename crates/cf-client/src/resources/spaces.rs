use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{AppEntity, Paged, Resource, SpaceEntity, SpaceSummary};

#[derive(Debug, Clone)]
pub struct Spaces {
    handle: ApiHandle,
}

impl Spaces {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<SpaceEntity>, CfError> {
        self.handle.get_json("/v2/spaces", query).await
    }

    pub async fn get(&self, guid: &str) -> Result<Resource<SpaceEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/spaces/{}", guid), &ListQuery::new())
            .await
    }

    /// Apps and service instances of a space in one call.
    pub async fn summary(&self, guid: &str) -> Result<SpaceSummary, CfError> {
        self.handle
            .get_json(&format!("/v2/spaces/{}/summary", guid), &ListQuery::new())
            .await
    }

    pub async fn apps(&self, guid: &str, query: &ListQuery) -> Result<Paged<AppEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/spaces/{}/apps", guid), query)
            .await
    }
}
