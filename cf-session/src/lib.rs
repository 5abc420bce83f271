//! Cloud Foundry session for chat-bot scripts.
//!
//! [`CfSession::bootstrap`] logs in with the configured credentials, resolves
//! the configured organization and space, caches the service marketplace and
//! keeps the token alive in the background.
//!
//! # Architecture
//!
//! - [`CfConfig`]: environment-driven settings, with optional salted password
//! - [`ServiceCatalog`]: sorted marketplace cache and name lookups
//! - [`SpaceContext`] / [`PreferenceStore`]: default and per-user active space
//! - [`Keepalive`]: periodic token refresh owned by the session

mod bootstrap;
pub mod catalog;
pub mod config;
pub mod crypto;
mod error;
pub mod keepalive;
pub mod logging;
mod session;
pub mod space;

pub use bootstrap::{find_org, find_space};
pub use catalog::{
    CatalogEntry, CatalogSource, DEPRECATED_TAG, ServiceCatalog, build_service_catalog,
};
pub use config::CfConfig;
pub use crypto::{decrypt_password, encrypt_password};
pub use error::{Result, SessionError};
pub use keepalive::{Keepalive, KeepaliveHandle, KeepaliveStats, TOKEN_REFRESH_PERIOD, TokenRefresher};
pub use session::CfSession;
pub use space::{
    MemoryPreferenceStore, MessageContext, PreferenceStore, SpaceContext, SpaceRecord,
    UserPreference,
};

pub use cf_client;
