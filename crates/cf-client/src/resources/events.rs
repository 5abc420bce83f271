use crate::error::CfError;
use crate::handle::{ApiHandle, ListQuery};
use crate::models::{EventEntity, Paged};

#[derive(Debug, Clone)]
pub struct Events {
    handle: ApiHandle,
}

impl Events {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<EventEntity>, CfError> {
        self.handle.get_json("/v2/events", query).await
    }

    /// Most recent events first for one actee (app, space, service instance).
    pub async fn for_actee(
        &self,
        actee_guid: &str,
        per_page: u32,
    ) -> Result<Paged<EventEntity>, CfError> {
        let query = ListQuery::new()
            .filter("actee", actee_guid)
            .results_per_page(per_page)
            .order_direction("desc");
        self.list(&query).await
    }
}
