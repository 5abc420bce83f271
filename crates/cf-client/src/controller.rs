use reqwest::Method;
use tracing::debug;

use crate::error::CfError;
use crate::handle::{ApiHandle, decode_json};
use crate::models::Info;

/// Entry point of the Cloud Controller API.
#[derive(Debug, Clone)]
pub struct CloudController {
    handle: ApiHandle,
}

impl CloudController {
    pub fn new(handle: ApiHandle) -> Self {
        Self { handle }
    }

    /// `GET /v2/info`. Does not require a token.
    pub async fn get_info(&self) -> Result<Info, CfError> {
        let response = self.handle.request(Method::GET, "/v2/info").send().await?;
        let info: Info = decode_json(response).await?;
        debug!(
            authorization_endpoint = %info.authorization_endpoint,
            api_version = ?info.api_version,
            "Fetched cloud controller info"
        );
        Ok(info)
    }
}
