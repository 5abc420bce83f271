//! Cloud Foundry v2 and UAA client.
//!
//! [`CfClient`] bundles one handle per resource collection. All handles share
//! an HTTP client and a [`TokenCell`], so logging in once (or refreshing)
//! authenticates every handle.

mod client;
mod controller;
mod error;
mod handle;
mod logs;
pub mod models;
pub mod resources;
mod token;
mod uaa;

pub use client::{CfClient, default_client};
pub use controller::CloudController;
pub use error::CfError;
pub use handle::{ApiHandle, ListQuery};
pub use logs::Logs;
pub use resources::{
    Apps, Domains, Events, Organizations, Routes, SERVICES_PAGE_SIZE, ServiceBindings,
    ServiceInstances, Services, Spaces,
};
pub use token::{AuthToken, TokenCell};
pub use uaa::{DEFAULT_CLIENT_ID, UsersUaa};
