//! UAA password login and token refresh.

use parking_lot::RwLock;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::CfError;
use crate::handle::{decode_json, join_url};
use crate::token::{AuthToken, TokenCell};

/// Public OAuth client used by the cf CLI.
pub const DEFAULT_CLIENT_ID: &str = "cf";

pub struct UsersUaa {
    client: Client,
    endpoint: RwLock<Option<String>>,
    token: TokenCell,
    client_id: String,
}

impl UsersUaa {
    pub fn new(client: Client, token: TokenCell) -> Self {
        Self {
            client,
            endpoint: RwLock::new(None),
            token,
            client_id: DEFAULT_CLIENT_ID.to_string(),
        }
    }

    /// Points the handle at the authorization endpoint advertised by `/v2/info`.
    pub fn set_endpoint(&self, endpoint: &str) {
        *self.endpoint.write() = Some(endpoint.trim_end_matches('/').to_string());
    }

    pub fn endpoint(&self) -> Option<String> {
        self.endpoint.read().clone()
    }

    pub fn set_token(&self, token: AuthToken) {
        self.token.set(token);
    }

    fn token_url(&self) -> Result<String, CfError> {
        let endpoint = self
            .endpoint
            .read()
            .clone()
            .ok_or(CfError::MissingEndpoint("uaa"))?;
        Ok(join_url(&endpoint, "/oauth/token"))
    }

    /// Password grant. The returned token is not stored; callers decide where
    /// it goes.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthToken, CfError> {
        let params = [
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("username", username),
            ("password", password),
        ];
        let response = self
            .client
            .post(self.token_url()?)
            .basic_auth(&self.client_id, Some(""))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;
        let token: AuthToken = decode_json(response).await?;
        debug!(expires_in = ?token.expires_in, "UAA login succeeded");
        Ok(token)
    }

    /// Refresh grant using the refresh token currently in the cell. The new
    /// token replaces the old one for every handle sharing the cell.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<AuthToken, CfError> {
        let refresh_token = self.token.refresh_token().ok_or(CfError::NotAuthenticated)?;
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("refresh_token", refresh_token.as_str()),
        ];
        let response = self
            .client
            .post(self.token_url()?)
            .basic_auth(&self.client_id, Some(""))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;
        let mut token: AuthToken = decode_json(response).await?;
        // UAA may omit the refresh token when it is not rotated.
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token);
        }
        self.token.set(token.clone());
        debug!(expires_in = ?token.expires_in, "UAA token refreshed");
        Ok(token)
    }
}
