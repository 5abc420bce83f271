use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::controller::CloudController;
use crate::error::CfError;
use crate::handle::ApiHandle;
use crate::logs::Logs;
use crate::resources::{
    Apps, Domains, Events, Organizations, Routes, ServiceBindings, ServiceInstances, Services,
    Spaces,
};
use crate::token::{AuthToken, TokenCell};
use crate::uaa::UsersUaa;

pub(crate) const DEFAULT_UA: &str = concat!("cf-client/", env!("CARGO_PKG_VERSION"));

pub fn default_client() -> Result<Client, CfError> {
    Ok(Client::builder()
        .user_agent(DEFAULT_UA)
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// Every handle for one Cloud Controller endpoint, sharing one HTTP client
/// and one token cell.
pub struct CfClient {
    endpoint: Url,
    token: TokenCell,
    pub controller: CloudController,
    pub uaa: Arc<UsersUaa>,
    pub apps: Apps,
    pub orgs: Organizations,
    pub spaces: Spaces,
    pub services: Services,
    pub service_instances: ServiceInstances,
    pub service_bindings: ServiceBindings,
    pub events: Events,
    pub logs: Logs,
    pub domains: Domains,
    pub routes: Routes,
}

impl CfClient {
    pub fn new(endpoint: &str) -> Result<Self, CfError> {
        Self::with_client(endpoint, default_client()?)
    }

    pub fn with_client(endpoint: &str, client: Client) -> Result<Self, CfError> {
        let endpoint = Url::parse(endpoint)?;
        let token = TokenCell::new();
        let base = endpoint.as_str().trim_end_matches('/');
        let handle = ApiHandle::new(base, client.clone(), token.clone());

        Ok(Self {
            controller: CloudController::new(handle.clone()),
            uaa: Arc::new(UsersUaa::new(client.clone(), token.clone())),
            apps: Apps::new(handle.clone()),
            orgs: Organizations::new(handle.clone()),
            spaces: Spaces::new(handle.clone()),
            services: Services::new(handle.clone()),
            service_instances: ServiceInstances::new(handle.clone()),
            service_bindings: ServiceBindings::new(handle.clone()),
            events: Events::new(handle.clone()),
            logs: Logs::new(client, token.clone()),
            domains: Domains::new(handle.clone()),
            routes: Routes::new(handle),
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn token(&self) -> &TokenCell {
        &self.token
    }

    /// Installs the token for every handle at once.
    pub fn set_token(&self, token: AuthToken) {
        self.token.set(token);
    }
}
