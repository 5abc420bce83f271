//! Cloud Controller v2 response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /v2/info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub authorization_endpoint: String,
    #[serde(default)]
    pub token_endpoint: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub logging_endpoint: Option<String>,
    #[serde(default)]
    pub doppler_logging_endpoint: Option<String>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paged<E> {
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub prev_url: Option<String>,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub resources: Vec<Resource<E>>,
}

impl<E> Paged<E> {
    #[inline]
    pub fn has_next(&self) -> bool {
        self.next_url.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<E> {
    pub metadata: Metadata,
    pub entity: E,
}

impl<E> Resource<E> {
    #[inline]
    pub fn guid(&self) -> &str {
        &self.metadata.guid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub guid: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationEntity {
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub billing_enabled: Option<bool>,
    #[serde(default)]
    pub quota_definition_guid: Option<String>,
}

/// `GET /v2/organizations/{guid}/summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub spaces: Vec<OrganizationSpace>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSpace {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub app_count: u32,
    #[serde(default)]
    pub service_count: u32,
    #[serde(default)]
    pub mem_dev_total: u64,
    #[serde(default)]
    pub mem_prod_total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceEntity {
    pub name: String,
    #[serde(default)]
    pub organization_guid: Option<String>,
    #[serde(default)]
    pub allow_ssh: Option<bool>,
}

/// `GET /v2/spaces/{guid}/summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceSummary {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub apps: Vec<AppSummary>,
    #[serde(default)]
    pub services: Vec<ServiceInstanceSummary>,
}

/// App as it appears in space summaries and `GET /v2/apps/{guid}/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSummary {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub instances: Option<u32>,
    #[serde(default)]
    pub running_instances: Option<u32>,
    #[serde(default)]
    pub memory: Option<u64>,
    #[serde(default)]
    pub disk_quota: Option<u64>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub service_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstanceSummary {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub bound_app_count: u32,
    #[serde(default)]
    pub service_plan: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEntity {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub bindable: Option<bool>,
    /// JSON document encoded as a string by the broker.
    #[serde(default)]
    pub extra: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub service_broker_guid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstanceEntity {
    pub name: String,
    #[serde(default)]
    pub credentials: Option<Value>,
    #[serde(default)]
    pub service_plan_guid: Option<String>,
    #[serde(default)]
    pub space_guid: Option<String>,
    #[serde(default)]
    pub dashboard_url: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceBindingEntity {
    pub app_guid: String,
    pub service_instance_guid: String,
    #[serde(default)]
    pub credentials: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub actor_type: Option<String>,
    #[serde(default)]
    pub actor_name: Option<String>,
    #[serde(default)]
    pub actee: Option<String>,
    #[serde(default)]
    pub actee_type: Option<String>,
    #[serde(default)]
    pub actee_name: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub space_guid: Option<String>,
    #[serde(default)]
    pub organization_guid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEntity {
    pub name: String,
    #[serde(default)]
    pub space_guid: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub instances: Option<u32>,
    #[serde(default)]
    pub memory: Option<u64>,
    #[serde(default)]
    pub disk_quota: Option<u64>,
    #[serde(default)]
    pub buildpack: Option<String>,
    #[serde(default)]
    pub detected_buildpack: Option<String>,
    #[serde(default)]
    pub package_state: Option<String>,
    #[serde(default)]
    pub environment_json: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEntity {
    pub name: String,
    #[serde(default)]
    pub owning_organization_guid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntity {
    pub host: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub domain_guid: Option<String>,
    #[serde(default)]
    pub space_guid: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_services_page() {
        let body = r#"{
            "total_results": 2,
            "total_pages": 1,
            "prev_url": null,
            "next_url": null,
            "resources": [
                {
                    "metadata": {"guid": "svc-1", "url": "/v2/services/svc-1", "created_at": "2016-06-08T16:41:45Z"},
                    "entity": {
                        "label": "cloudantNoSQLDB",
                        "description": "Cloudant",
                        "active": true,
                        "extra": "{\"displayName\":\"Cloudant NoSQL DB\"}",
                        "tags": ["data_management", "ibm_created"]
                    }
                },
                {
                    "metadata": {"guid": "svc-2"},
                    "entity": {"label": "bare"}
                }
            ]
        }"#;
        let page: Paged<ServiceEntity> = serde_json::from_str(body).unwrap();
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
        assert_eq!(page.resources.len(), 2);
        assert_eq!(page.resources[0].guid(), "svc-1");
        assert!(page.resources[0].metadata.created_at.is_some());
        assert_eq!(page.resources[1].entity.description, "");
        assert!(page.resources[1].entity.tags.is_none());
    }

    #[test]
    fn parses_event_type_field() {
        let body = r#"{"type":"audit.app.update","actee_name":"my-app","timestamp":"2016-06-08T16:41:45Z"}"#;
        let event: EventEntity = serde_json::from_str(body).unwrap();
        assert_eq!(event.kind, "audit.app.update");
        assert_eq!(event.actee_name.as_deref(), Some("my-app"));
    }

    #[test]
    fn org_summary_defaults_missing_counts() {
        let body = r#"{"guid":"o-1","name":"org","spaces":[{"guid":"s-1","name":"dev"}]}"#;
        let summary: OrganizationSummary = serde_json::from_str(body).unwrap();
        assert_eq!(summary.spaces[0].app_count, 0);
        assert_eq!(summary.spaces[0].name, "dev");
    }
}
