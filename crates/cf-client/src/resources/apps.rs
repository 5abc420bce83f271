use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{AppEntity, AppSummary, Paged, Resource};

#[derive(Debug, Clone)]
pub struct Apps {
    handle: ApiHandle,
}

impl Apps {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<AppEntity>, CfError> {
        self.handle.get_json("/v2/apps", query).await
    }

    pub async fn get(&self, guid: &str) -> Result<Resource<AppEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/apps/{}", guid), &ListQuery::new())
            .await
    }

    pub async fn summary(&self, guid: &str) -> Result<AppSummary, CfError> {
        self.handle
            .get_json(&format!("/v2/apps/{}/summary", guid), &ListQuery::new())
            .await
    }

    /// Every app with this name across the spaces visible to the user.
    pub async fn find_apps(&self, name: &str) -> Result<Vec<Resource<AppEntity>>, CfError> {
        let page = self.list(&ListQuery::new().filter("name", name)).await?;
        Ok(page.resources)
    }

    /// The app with this name inside one space, if any.
    pub async fn find_app(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Result<Option<Resource<AppEntity>>, CfError> {
        let query = ListQuery::new()
            .filter("name", name)
            .filter("space_guid", space_guid);
        let page = self.list(&query).await?;
        Ok(page.resources.into_iter().next())
    }
}
