//! Org/space context and the per-user active space.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A space by name and guid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRecord {
    pub name: String,
    pub guid: String,
}

impl SpaceRecord {
    pub fn new(name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: guid.into(),
        }
    }
}

/// Org and space resolved at bootstrap. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceContext {
    pub org_name: String,
    pub org_guid: String,
    pub space_name: String,
    pub space_guid: String,
}

impl SpaceContext {
    pub fn default_space(&self) -> SpaceRecord {
        SpaceRecord::new(&self.space_name, &self.space_guid)
    }
}

/// Stored preferences of one chat user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreference {
    #[serde(default)]
    pub space: Option<SpaceRecord>,
}

/// Identity of the user behind the message being handled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContext {
    pub user_id: Option<String>,
}

impl MessageContext {
    pub fn from_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}

/// Host-side key/value store of per-user preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserPreference>>;

    async fn put(&self, user_id: &str, preference: UserPreference) -> Result<()>;
}

/// In-process preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RwLock<HashMap<String, UserPreference>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserPreference>> {
        Ok(self.entries.read().get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, preference: UserPreference) -> Result<()> {
        self.entries.write().insert(user_id.to_string(), preference);
        Ok(())
    }
}

/// The user's preferred space when the host can identify the user and a
/// preference exists; the default space otherwise. Looked up on every call.
pub async fn resolve_active_space(
    default: &SpaceContext,
    host: Option<(&dyn PreferenceStore, &MessageContext)>,
) -> Result<SpaceRecord> {
    let Some((store, message)) = host else {
        return Ok(default.default_space());
    };
    let Some(user_id) = message.user_id.as_deref().filter(|id| !id.is_empty()) else {
        return Ok(default.default_space());
    };

    Ok(store
        .get(user_id)
        .await?
        .and_then(|pref| pref.space)
        .unwrap_or_else(|| default.default_space()))
}

/// Stores `space` as the user's active space, keeping other preferences.
pub async fn store_active_space(
    store: &dyn PreferenceStore,
    user_id: &str,
    space: SpaceRecord,
) -> Result<()> {
    let mut preference = store.get(user_id).await?.unwrap_or_default();
    preference.space = Some(space);
    store.put(user_id, preference).await
}
