use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{DomainEntity, Paged, Resource};

#[derive(Debug, Clone)]
pub struct Domains {
    handle: ApiHandle,
}

impl Domains {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<DomainEntity>, CfError> {
        self.handle.get_json("/v2/domains", query).await
    }

    pub async fn get(&self, guid: &str) -> Result<Resource<DomainEntity>, CfError> {
        self.handle
            .get_json(&format!("/v2/domains/{}", guid), &ListQuery::new())
            .await
    }
}
