use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::Client;

use crate::error::CfError;
use crate::handle::join_url;
use crate::token::TokenCell;

/// Loggregator recent-logs access.
pub struct Logs {
    client: Client,
    endpoint: RwLock<Option<String>>,
    token: TokenCell,
}

impl Logs {
    pub fn new(client: Client, token: TokenCell) -> Self {
        Self {
            client,
            endpoint: RwLock::new(None),
            token,
        }
    }

    pub fn set_endpoint(&self, endpoint: &str) {
        *self.endpoint.write() = Some(endpoint.trim_end_matches('/').to_string());
    }

    pub fn endpoint(&self) -> Option<String> {
        self.endpoint.read().clone()
    }

    /// Raw recent-log envelope for an app, as served by loggregator.
    pub async fn recent(&self, app_guid: &str) -> Result<Bytes, CfError> {
        let endpoint = self
            .endpoint
            .read()
            .clone()
            .ok_or(CfError::MissingEndpoint("logs"))?;
        let authorization = self.token.authorization().ok_or(CfError::NotAuthenticated)?;
        let response = self
            .client
            .get(join_url(&endpoint, "/recent"))
            .query(&[("app", app_guid)])
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CfError::Api {
                status: status.as_u16(),
                description: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?)
    }
}
