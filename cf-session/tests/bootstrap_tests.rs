//! End-to-end bootstrap against an in-process mock of the CF API.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use cf_session::cf_client::CfClient;
use cf_session::{
    CfConfig, CfSession, MemoryPreferenceStore, MessageContext, PreferenceStore, SessionError,
    SpaceRecord,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
struct MockCf {
    base: String,
    service_pages: Vec<Value>,
    fail_service_page: Option<u32>,
    space_summary_delay: Option<Duration>,
    service_requests: AtomicUsize,
    org_summary_requests: AtomicUsize,
    space_summary_requests: AtomicUsize,
    refreshes: AtomicUsize,
}

fn service(guid: &str, label: &str, display_name: Option<&str>, tags: &[&str]) -> Value {
    json!({
        "metadata": {"guid": guid},
        "entity": {
            "label": label,
            "description": format!("{} description", label),
            "extra": display_name.map(|n| json!({"displayName": n, "documentationUrl": format!("https://docs/{}", label)}).to_string()),
            "tags": tags,
        }
    })
}

fn default_service_pages() -> Vec<Value> {
    vec![
        json!({
            "total_results": 3,
            "total_pages": 2,
            "resources": [
                service("validService2Guid", "validService2", Some("A ValidService2 Display Name"), &["ibm_deprecated"]),
                service("zGuid", "zService", None, &[]),
            ]
        }),
        json!({
            "total_results": 3,
            "total_pages": 2,
            "resources": [
                service("validService1Guid", "validService1", None, &["ibm_created"]),
            ]
        }),
    ]
}

async fn info(State(state): State<Arc<MockCf>>) -> impl IntoResponse {
    Json(json!({
        "api_version": "2.54.0",
        "authorization_endpoint": format!("{}/uaa", state.base),
    }))
}

async fn token(
    State(state): State<Arc<MockCf>>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let grant = form.get("grant_type").cloned().unwrap_or_default();
    if grant == "password" && form.get("password").map(String::as_str) == Some("passw0rd!") {
        return (
            StatusCode::OK,
            Json(json!({"access_token": "token-0", "token_type": "bearer", "refresh_token": "refresh"})),
        );
    }
    if grant == "refresh_token" {
        let n = state.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        return (
            StatusCode::OK,
            Json(json!({"access_token": format!("token-{}", n), "token_type": "bearer"})),
        );
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized", "error_description": "Bad credentials"})),
    )
}

async fn organizations() -> impl IntoResponse {
    Json(json!({
        "total_results": 2,
        "total_pages": 1,
        "resources": [
            {"metadata": {"guid": "other-org-guid"}, "entity": {"name": "other"}},
            {"metadata": {"guid": "acme-guid"}, "entity": {"name": "acme"}}
        ]
    }))
}

async fn org_summary(State(state): State<Arc<MockCf>>, Path(guid): Path<String>) -> impl IntoResponse {
    state.org_summary_requests.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "guid": guid,
        "name": "acme",
        "spaces": [
            {"guid": "dev-guid", "name": "dev"},
            {"guid": "prod-guid", "name": "prod"}
        ]
    }))
}

async fn space_summary(State(state): State<Arc<MockCf>>, Path(guid): Path<String>) -> impl IntoResponse {
    state.space_summary_requests.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = state.space_summary_delay {
        tokio::time::sleep(delay).await;
    }
    Json(json!({"guid": guid, "name": "dev", "apps": [], "services": []}))
}

async fn services(
    State(state): State<Arc<MockCf>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.service_requests.fetch_add(1, Ordering::SeqCst);
    assert_eq!(params.get("results-per-page").map(String::as_str), Some("100"));
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    if state.fail_service_page == Some(page) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"description": "catalog unavailable"})),
        );
    }
    (StatusCode::OK, Json(state.service_pages[(page - 1) as usize].clone()))
}

async fn spawn_mock(configure: impl FnOnce(&mut MockCf)) -> (String, Arc<MockCf>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let mut mock = MockCf {
        base: base.clone(),
        service_pages: default_service_pages(),
        ..Default::default()
    };
    configure(&mut mock);
    let state = Arc::new(mock);

    let api = Router::new()
        .route("/v2/info", get(info))
        .route("/v2/organizations", get(organizations))
        .route("/v2/organizations/{guid}/summary", get(org_summary))
        .route("/v2/spaces/{guid}/summary", get(space_summary))
        .route("/v2/services", get(services));
    let app = Router::new()
        .nest("/api", api)
        .route("/uaa/oauth/token", post(token))
        .with_state(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (base, state)
}

fn config(base: &str, org: &str, space: &str, password: &str) -> CfConfig {
    CfConfig::new(format!("{}/api", base), org, space, "bot@example.com", password)
}

async fn bootstrap(base: &str, org: &str, space: &str) -> Result<Arc<CfSession>, SessionError> {
    bootstrap_with(config(base, org, space, "passw0rd!")).await
}

async fn bootstrap_with(config: CfConfig) -> Result<Arc<CfSession>, SessionError> {
    let client = CfClient::new(&config.endpoint)?;
    CfSession::bootstrap_with_client(config, client).await
}

#[tokio::test]
async fn bootstrap_resolves_context_and_catalog() {
    let (base, state) = spawn_mock(|_| {}).await;
    let session = bootstrap(&base, "acme", "dev").await.unwrap();

    let context = session.context();
    assert_eq!(context.org_guid, "acme-guid");
    assert_eq!(context.space_guid, "dev-guid");
    assert_eq!(session.token().unwrap().access_token, "token-0");
    assert_eq!(
        session.logs().endpoint().as_deref(),
        Some(format!("{}/loggregator", base).as_str())
    );

    assert_eq!(state.service_requests.load(Ordering::SeqCst), 2);

    let labels: Vec<_> = session
        .service_catalog()
        .into_iter()
        .map(|e| e.label)
        .collect();
    assert_eq!(labels, vec!["validService1", "validService2", "zService"]);

    session.shutdown().await;
}

#[tokio::test]
async fn lookups_match_label_and_display_name() {
    let (base, _) = spawn_mock(|_| {}).await;
    let session = bootstrap(&base, "acme", "dev").await.unwrap();

    assert_eq!(session.service_guid("validService1").as_deref(), Some("validService1Guid"));
    assert_eq!(
        session.service_guid("A ValidService2 Display Name"),
        session.service_guid("validService2")
    );
    assert_eq!(session.service_guid("foo"), None);

    assert_eq!(session.service_label("A ValidService2 Display Name"), "validService2");
    assert_eq!(session.service_label("invalidDisplayName"), "invalidDisplayName");
    assert_eq!(
        session.service_display_name("validService2"),
        "A ValidService2 Display Name"
    );
    assert_eq!(session.service_display_name("invalidLabel"), "invalidLabel");

    let deprecated = session.service_entry("validService2").unwrap();
    assert!(deprecated.deprecated);
    assert_eq!(deprecated.doc_url.as_deref(), Some("https://docs/validService2"));
    let current = session.service_entry("validService1").unwrap();
    assert!(!current.deprecated);
    assert_eq!(current.display_name, "validService1");

    session.shutdown().await;
}

#[tokio::test]
async fn unknown_org_aborts_before_space_resolution() {
    let (base, state) = spawn_mock(|_| {}).await;
    let err = bootstrap(&base, "missing-org", "dev").await.err().unwrap();

    assert!(matches!(err, SessionError::OrgNotFound(ref name) if name == "missing-org"));
    assert!(err.to_string().contains("Org was not found"));
    assert_eq!(state.org_summary_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_space_aborts_bootstrap() {
    let (base, state) = spawn_mock(|_| {}).await;
    let err = bootstrap(&base, "acme", "qa").await.err().unwrap();

    assert!(matches!(err, SessionError::SpaceNotFound(_)));
    assert!(err.to_string().contains("Space not found"));
    assert_eq!(state.space_summary_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bad_password_fails_login() {
    let (base, state) = spawn_mock(|_| {}).await;
    let config = config(&base, "acme", "dev", "wrong");
    let client = CfClient::new(&config.endpoint).unwrap();
    let err = CfSession::bootstrap_with_client(config, client).await.err().unwrap();

    match err {
        SessionError::Client(e) => assert!(e.is_unauthorized()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(state.service_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn catalog_failure_does_not_block_readiness() {
    let (base, _) = spawn_mock(|mock| mock.fail_service_page = Some(2)).await;
    let session = bootstrap(&base, "acme", "dev").await.unwrap();

    assert!(session.service_catalog().is_empty());
    assert_eq!(session.service_guid("validService1"), None);
    assert_eq!(session.service_label("anything"), "anything");

    session.shutdown().await;
}

#[tokio::test]
async fn rebuild_catalog_refetches_every_page() {
    let (base, state) = spawn_mock(|_| {}).await;
    let session = bootstrap(&base, "acme", "dev").await.unwrap();

    assert_eq!(session.rebuild_catalog().await.unwrap(), 3);
    assert_eq!(state.service_requests.load(Ordering::SeqCst), 4);

    session.shutdown().await;
}

#[tokio::test]
async fn active_space_prefers_user_override() {
    let (base, _) = spawn_mock(|_| {}).await;
    let session = bootstrap(&base, "acme", "dev").await.unwrap();
    let store = MemoryPreferenceStore::new();
    let brain: &dyn PreferenceStore = &store;

    let default = session.active_space(None).await.unwrap();
    assert_eq!(default, SpaceRecord::new("dev", "dev-guid"));

    session
        .set_active_space(brain, "12345", SpaceRecord::new("X", "x-guid"))
        .await
        .unwrap();

    let message = MessageContext::from_user("12345");
    let active = session.active_space(Some((brain, &message))).await.unwrap();
    assert_eq!(active, SpaceRecord::new("X", "x-guid"));

    let other = MessageContext::from_user("67890");
    let active = session.active_space(Some((brain, &other))).await.unwrap();
    assert_eq!(active.guid, "dev-guid");

    session.shutdown().await;
}

#[tokio::test]
async fn refresh_now_replaces_shared_token() {
    let (base, state) = spawn_mock(|_| {}).await;
    let session = bootstrap(&base, "acme", "dev").await.unwrap();
    assert!(session.is_keepalive_running());

    assert!(session.refresh_token_now().await);
    assert_eq!(state.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(session.token().unwrap().access_token, "token-1");
    assert_eq!(session.keepalive_stats().successes, 1);

    session.shutdown().await;
    assert!(!session.is_keepalive_running());
}

#[tokio::test]
async fn space_summary_warm_up_does_not_delay_readiness() {
    let (base, state) = spawn_mock(|mock| mock.space_summary_delay = Some(Duration::from_secs(20))).await;

    let session = tokio::time::timeout(Duration::from_secs(5), bootstrap(&base, "acme", "dev"))
        .await
        .expect("bootstrap waited on the space summary")
        .unwrap();
    assert_eq!(session.context().space_guid, "dev-guid");

    for _ in 0..50 {
        if state.space_summary_requests.load(Ordering::SeqCst) == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(state.space_summary_requests.load(Ordering::SeqCst), 1);

    session.shutdown().await;
}

#[tokio::test]
async fn dropping_session_stops_keepalive() {
    let (base, state) = spawn_mock(|_| {}).await;
    let config = config(&base, "acme", "dev", "passw0rd!")
        .with_token_refresh_period(Duration::from_millis(50));
    let session = bootstrap_with(config).await.unwrap();

    drop(session);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(state.refreshes.load(Ordering::SeqCst), 0);
}
