use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{OrganizationEntity, OrganizationSummary, Paged, Resource, SpaceEntity};

#[derive(Debug, Clone)]
pub struct Organizations {
    handle: ApiHandle,
}

impl Organizations {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    /// Organizations visible to the authenticated user.
    pub async fn list(&self, query: &ListQuery) -> Result<Paged<OrganizationEntity>, CfError> {
        self.handle.get_json("/v2/organizations", query).await
    }

    pub async fn get(&self, guid: &str) -> Result<Resource<OrganizationEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/organizations/{}", guid), &ListQuery::new())
            .await
    }

    pub async fn summary(&self, guid: &str) -> Result<OrganizationSummary, CfError> {
        self.handle
            .get_json(
                &format!("/v2/organizations/{}/summary", guid),
                &ListQuery::new(),
            )
            .await
    }

    pub async fn spaces(
        &self,
        guid: &str,
        query: &ListQuery,
    ) -> Result<Paged<SpaceEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/organizations/{}/spaces", guid), query)
            .await
    }
}
