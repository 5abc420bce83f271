//! Service marketplace cache.
//!
//! The catalog is fetched page by page, normalized into [`CatalogEntry`]
//! values and kept sorted by label. Lookups never fail: unknown names yield
//! `None` or echo the input back.

use std::cmp::Ordering;

use async_trait::async_trait;
use cf_client::models::{Paged, Resource, ServiceEntity};
use cf_client::{CfError, SERVICES_PAGE_SIZE, Services};
use icu_collator::{Collator, CollatorOptions, Strength};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Tag marking a service as deprecated in the marketplace.
pub const DEPRECATED_TAG: &str = "ibm_deprecated";

/// Normalized marketplace entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub guid: String,
    pub description: String,
    pub label: String,
    /// Broker-provided display name, or the label when there is none.
    pub display_name: String,
    pub doc_url: Option<String>,
    pub deprecated: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceExtra {
    display_name: Option<String>,
    documentation_url: Option<String>,
}

impl CatalogEntry {
    pub fn from_resource(resource: &Resource<ServiceEntity>) -> Self {
        let entity = &resource.entity;
        let extra = entity
            .extra
            .as_deref()
            .map(|raw| parse_extra(&entity.label, raw))
            .unwrap_or_default();

        Self {
            guid: resource.metadata.guid.clone(),
            description: entity.description.clone(),
            label: entity.label.clone(),
            display_name: extra
                .display_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| entity.label.clone()),
            doc_url: extra.documentation_url.filter(|url| !url.is_empty()),
            deprecated: entity
                .tags
                .as_ref()
                .is_some_and(|tags| tags.iter().any(|tag| tag == DEPRECATED_TAG)),
        }
    }

    /// Whether `name` is this entry's label or display name.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        self.label == name || self.display_name == name
    }
}

fn parse_extra(label: &str, raw: &str) -> ServiceExtra {
    match serde_json::from_str(raw) {
        Ok(extra) => extra,
        Err(e) => {
            warn!(label, error = %e, "Ignoring malformed service extra metadata");
            ServiceExtra::default()
        }
    }
}

/// Root-locale collator at tertiary strength: accents and case only break
/// ties, punctuation sorts before digits and digits before letters.
pub fn label_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!(error = %e, "Collation data unavailable, sorting labels by code point");
            None
        }
    }
}

/// Compares two labels in locale order. Collation-equal labels fall back to
/// code point order so the sort stays total.
pub fn locale_cmp(collator: &Collator, a: &str, b: &str) -> Ordering {
    collator.compare(a, b).then_with(|| a.cmp(b))
}

pub fn sort_catalog(entries: &mut [CatalogEntry]) {
    match label_collator() {
        Some(collator) => entries.sort_by(|l, r| locale_cmp(&collator, &l.label, &r.label)),
        None => entries.sort_by(|l, r| l.label.cmp(&r.label)),
    }
}

/// Paged access to the marketplace.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_page(&self, page: u32, per_page: u32) -> std::result::Result<Paged<ServiceEntity>, CfError>;
}

#[async_trait]
impl CatalogSource for Services {
    async fn fetch_page(&self, page: u32, per_page: u32) -> std::result::Result<Paged<ServiceEntity>, CfError> {
        self.page(page, per_page).await
    }
}

/// Fetches every page of the marketplace and returns the sorted entries.
///
/// Pages are requested one at a time starting at 1 until the current page
/// reaches the reported page count. Any failed page aborts the build.
pub async fn build_service_catalog(source: &dyn CatalogSource) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();
    let mut page = 1;

    loop {
        info!(page, "Requesting page {} of all services", page);
        let result = source.fetch_page(page, SERVICES_PAGE_SIZE).await?;
        entries.extend(result.resources.iter().map(CatalogEntry::from_resource));

        if page >= result.total_pages {
            break;
        }
        page += 1;
    }

    sort_catalog(&mut entries);
    debug!(entries = entries.len(), pages = page, "Service catalog built");
    Ok(entries)
}

/// Sorted, shareable catalog.
#[derive(Debug, Default)]
pub struct ServiceCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(mut entries: Vec<CatalogEntry>) -> Self {
        sort_catalog(&mut entries);
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Swaps in a new entry list wholesale.
    pub fn replace(&self, mut entries: Vec<CatalogEntry>) {
        sort_catalog(&mut entries);
        *self.entries.write() = entries;
    }

    /// Rebuilds from `source`. The current entries stay untouched on failure.
    pub async fn rebuild(&self, source: &dyn CatalogSource) -> Result<usize> {
        let entries = build_service_catalog(source).await?;
        let count = entries.len();
        self.replace(entries);
        Ok(count)
    }

    pub fn snapshot(&self) -> Vec<CatalogEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// First entry whose label or display name equals `name`.
    pub fn entry_for(&self, name: &str) -> Option<CatalogEntry> {
        self.entries.read().iter().find(|e| e.matches(name)).cloned()
    }

    /// Guid of the first entry whose label or display name equals `name`.
    pub fn guid_for(&self, name: &str) -> Option<String> {
        self.entries
            .read()
            .iter()
            .find(|e| e.matches(name))
            .map(|e| e.guid.clone())
    }

    /// Label for a display name; unknown names are returned unchanged.
    pub fn label_for(&self, display_name: &str) -> String {
        self.entries
            .read()
            .iter()
            .find(|e| e.display_name == display_name)
            .map(|e| e.label.clone())
            .unwrap_or_else(|| display_name.to_string())
    }

    /// Display name for a label; unknown labels are returned unchanged.
    pub fn display_name_for(&self, label: &str) -> String {
        self.entries
            .read()
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| label.to_string())
    }
}
