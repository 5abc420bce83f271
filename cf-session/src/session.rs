//! The ready session shared with chat-bot scripts.

use cf_client::{
    Apps, AuthToken, CfClient, Domains, Events, Logs, Organizations, Routes, ServiceBindings,
    ServiceInstances, Services, Spaces, UsersUaa,
};
use tracing::{info, instrument};

use crate::catalog::{CatalogEntry, ServiceCatalog};
use crate::config::CfConfig;
use crate::error::Result;
use crate::keepalive::{KeepaliveHandle, KeepaliveStats};
use crate::space::{
    MessageContext, PreferenceStore, SpaceContext, SpaceRecord, resolve_active_space,
    store_active_space,
};

/// Authenticated session: platform handles, the resolved org/space and the
/// service catalog. Built by [`CfSession::bootstrap`]; read-only afterwards
/// except for [`CfSession::rebuild_catalog`].
pub struct CfSession {
    config: CfConfig,
    client: CfClient,
    context: SpaceContext,
    catalog: ServiceCatalog,
    keepalive: KeepaliveHandle,
}

impl CfSession {
    pub(crate) fn new(
        config: CfConfig,
        client: CfClient,
        context: SpaceContext,
        catalog: ServiceCatalog,
        keepalive: KeepaliveHandle,
    ) -> Self {
        Self {
            config,
            client,
            context,
            catalog,
            keepalive,
        }
    }

    pub fn config(&self) -> &CfConfig {
        &self.config
    }

    pub fn client(&self) -> &CfClient {
        &self.client
    }

    /// Org and space resolved at bootstrap.
    pub fn context(&self) -> &SpaceContext {
        &self.context
    }

    /// Current session token.
    pub fn token(&self) -> Option<AuthToken> {
        self.client.token().get()
    }

    pub fn orgs(&self) -> &Organizations {
        &self.client.orgs
    }

    pub fn spaces(&self) -> &Spaces {
        &self.client.spaces
    }

    pub fn services(&self) -> &Services {
        &self.client.services
    }

    pub fn service_instances(&self) -> &ServiceInstances {
        &self.client.service_instances
    }

    pub fn service_bindings(&self) -> &ServiceBindings {
        &self.client.service_bindings
    }

    pub fn events(&self) -> &Events {
        &self.client.events
    }

    pub fn logs(&self) -> &Logs {
        &self.client.logs
    }

    pub fn apps(&self) -> &Apps {
        &self.client.apps
    }

    pub fn domains(&self) -> &Domains {
        &self.client.domains
    }

    pub fn routes(&self) -> &Routes {
        &self.client.routes
    }

    pub fn uaa(&self) -> &UsersUaa {
        &self.client.uaa
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Sorted copy of the service catalog.
    pub fn service_catalog(&self) -> Vec<CatalogEntry> {
        self.catalog.snapshot()
    }

    /// Guid of the service with this label or display name.
    pub fn service_guid(&self, name: &str) -> Option<String> {
        self.catalog.guid_for(name)
    }

    pub fn service_entry(&self, name: &str) -> Option<CatalogEntry> {
        self.catalog.entry_for(name)
    }

    /// Label for a display name, or the input when unknown.
    pub fn service_label(&self, display_name: &str) -> String {
        self.catalog.label_for(display_name)
    }

    /// Display name for a label, or the input when unknown.
    pub fn service_display_name(&self, label: &str) -> String {
        self.catalog.display_name_for(label)
    }

    /// Fetches the marketplace again and swaps it in on success.
    #[instrument(skip(self))]
    pub async fn rebuild_catalog(&self) -> Result<usize> {
        let count = self.catalog.rebuild(&self.client.services).await?;
        info!(entries = count, "Service catalog rebuilt");
        Ok(count)
    }

    /// Active space for the user behind `host`, falling back to the session's space.
    pub async fn active_space(
        &self,
        host: Option<(&dyn PreferenceStore, &MessageContext)>,
    ) -> Result<SpaceRecord> {
        resolve_active_space(&self.context, host).await
    }

    /// Records a per-user space override.
    pub async fn set_active_space(
        &self,
        store: &dyn PreferenceStore,
        user_id: &str,
        space: SpaceRecord,
    ) -> Result<()> {
        store_active_space(store, user_id, space).await
    }

    /// Refreshes the token outside the keepalive schedule.
    pub async fn refresh_token_now(&self) -> bool {
        self.keepalive.refresh_now().await
    }

    pub fn keepalive_stats(&self) -> KeepaliveStats {
        self.keepalive.stats()
    }

    pub fn is_keepalive_running(&self) -> bool {
        self.keepalive.is_running()
    }

    /// Stops the keepalive task.
    pub async fn shutdown(&self) {
        self.keepalive.shutdown().await;
        info!("Cloud Foundry session closed");
    }
}
