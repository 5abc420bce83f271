//! Session error types.

use cf_client::CfError;
use thiserror::Error;

/// Errors raised while building or using a [`CfSession`](crate::CfSession).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Password could not be decrypted with the configured salt.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// No organization with the configured name.
    #[error("Org was not found: {0}")]
    OrgNotFound(String),

    /// No space with the configured name inside the organization.
    #[error("Space not found: {0}")]
    SpaceNotFound(String),

    /// Platform call failed.
    #[error("Cloud Foundry error: {0}")]
    Client(#[from] CfError),

    /// Background task failed to complete.
    #[error("Task error: {0}")]
    Task(String),
}

impl SessionError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the failure came from resolving the configured org or space.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::OrgNotFound(_) | Self::SpaceNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
