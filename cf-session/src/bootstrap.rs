//! Login and org/space resolution.
//!
//! Order: cloud controller info, UAA login, token installation, then org and
//! space lookup while the service catalog builds on a separate task. No step
//! is retried. The space summary warm-up runs detached after readiness.

use std::sync::Arc;

use cf_client::models::{OrganizationEntity, OrganizationSpace, OrganizationSummary, Resource};
use cf_client::{CfClient, ListQuery};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{ServiceCatalog, build_service_catalog};
use crate::config::CfConfig;
use crate::error::{Result, SessionError};
use crate::keepalive::Keepalive;
use crate::session::CfSession;
use crate::space::SpaceContext;

const ORGS_PAGE_SIZE: u32 = 100;

/// First organization with exactly this name.
pub fn find_org<'a>(
    orgs: &'a [Resource<OrganizationEntity>],
    name: &str,
) -> Option<&'a Resource<OrganizationEntity>> {
    orgs.iter().find(|org| org.entity.name == name)
}

/// First space of the summary with exactly this name.
pub fn find_space<'a>(summary: &'a OrganizationSummary, name: &str) -> Option<&'a OrganizationSpace> {
    summary.spaces.iter().find(|space| space.name == name)
}

impl CfSession {
    /// Opens a session against the configured endpoint.
    pub async fn bootstrap(config: CfConfig) -> Result<Arc<CfSession>> {
        let client = CfClient::new(&config.endpoint)?;
        Self::bootstrap_with_client(config, client).await
    }

    /// Opens a session using a prepared client.
    #[instrument(skip_all, fields(endpoint = %config.endpoint, org = %config.org_name, space = %config.space_name))]
    pub async fn bootstrap_with_client(config: CfConfig, client: CfClient) -> Result<Arc<CfSession>> {
        match connect(config, client).await {
            Ok(session) => Ok(session),
            Err(e) => {
                error!(error = %e, "Cloud Foundry bootstrap failed");
                Err(e)
            }
        }
    }
}

async fn connect(config: CfConfig, client: CfClient) -> Result<Arc<CfSession>> {
    login(&config, &client).await?;

    let services = client.services.clone();
    let catalog_task = tokio::spawn(async move { build_service_catalog(&services).await });

    let context = match resolve_context(&config, &client).await {
        Ok(context) => context,
        Err(e) => {
            catalog_task.abort();
            return Err(e);
        }
    };

    // A failed catalog does not block readiness; lookups just find nothing.
    let catalog = match catalog_task.await {
        Ok(Ok(entries)) => {
            info!(entries = entries.len(), "Service catalog ready");
            ServiceCatalog::from_entries(entries)
        }
        Ok(Err(e)) => {
            error!(error = %e, "Failed to build service catalog");
            ServiceCatalog::new()
        }
        Err(e) => {
            error!(error = %e, "Service catalog task failed");
            ServiceCatalog::new()
        }
    };

    // Warm-up only; readiness does not wait on it.
    let spaces = client.spaces.clone();
    let space_guid = context.space_guid.clone();
    tokio::spawn(async move {
        if let Err(e) = spaces.summary(&space_guid).await {
            warn!(error = %e, %space_guid, "Failed to fetch space summary");
        }
    });

    let keepalive = Keepalive::new(client.uaa.clone(), config.token_refresh_period)
        .spawn(CancellationToken::new());

    info!(
        org_guid = %context.org_guid,
        space_guid = %context.space_guid,
        "Cloud Foundry session ready"
    );
    Ok(Arc::new(CfSession::new(config, client, context, catalog, keepalive)))
}

/// Resolves the UAA endpoint, logs in and installs the token on every handle.
#[instrument(skip_all)]
async fn login(config: &CfConfig, client: &CfClient) -> Result<()> {
    let info = client.controller.get_info().await?;
    client.uaa.set_endpoint(&info.authorization_endpoint);

    let token = client.uaa.login(&config.username, config.password()).await?;
    client.set_token(token);
    client.logs.set_endpoint(&config.log_endpoint());

    debug!(
        authorization_endpoint = %info.authorization_endpoint,
        log_endpoint = %config.log_endpoint(),
        "Logged in"
    );
    Ok(())
}

#[instrument(skip_all)]
async fn resolve_context(config: &CfConfig, client: &CfClient) -> Result<SpaceContext> {
    let org_guid = find_org_guid(config, client).await?;
    let summary = client.orgs.summary(&org_guid).await?;

    let space = find_space(&summary, &config.space_name)
        .ok_or_else(|| SessionError::SpaceNotFound(config.space_name.clone()))?;

    Ok(SpaceContext {
        org_name: config.org_name.clone(),
        org_guid,
        space_name: space.name.clone(),
        space_guid: space.guid.clone(),
    })
}

async fn find_org_guid(config: &CfConfig, client: &CfClient) -> Result<String> {
    let mut page = 1;
    loop {
        let query = ListQuery::new().results_per_page(ORGS_PAGE_SIZE).page(page);
        let result = client.orgs.list(&query).await?;
        if let Some(org) = find_org(&result.resources, &config.org_name) {
            return Ok(org.guid().to_string());
        }
        if page >= result.total_pages {
            return Err(SessionError::OrgNotFound(config.org_name.clone()));
        }
        page += 1;
    }
}
