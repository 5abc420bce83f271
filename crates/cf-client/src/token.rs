//! Bearer token shared by every handle of a [`CfClient`](crate::CfClient).

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Token pair issued by UAA.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl AuthToken {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            refresh_token,
            expires_in: None,
            scope: None,
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("token_type", &self.token_type)
            .field("access_token", &"<redacted>")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Cloneable cell holding the current token.
///
/// Every handle created from the same client holds a clone of one cell, so a
/// single `set` reaches all of them.
#[derive(Debug, Clone, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<AuthToken>>>,
}

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: AuthToken) {
        *self.inner.write() = Some(token);
    }

    pub fn get(&self) -> Option<AuthToken> {
        self.inner.read().clone()
    }

    pub fn clear(&self) {
        self.inner.write().take();
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.inner.read().is_some()
    }

    pub(crate) fn authorization(&self) -> Option<String> {
        self.inner.read().as_ref().map(AuthToken::authorization)
    }

    pub(crate) fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }
}
