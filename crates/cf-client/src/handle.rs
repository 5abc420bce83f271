use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CfError;
use crate::token::TokenCell;

/// Query parameters for Cloud Controller list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    filters: Vec<String>,
    results_per_page: Option<u32>,
    page: Option<u32>,
    order_direction: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `q=field:value` filter.
    pub fn filter(mut self, field: &str, value: &str) -> Self {
        self.filters.push(format!("{}:{}", field, value));
        self
    }

    pub fn results_per_page(mut self, count: u32) -> Self {
        self.results_per_page = Some(count);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn order_direction(mut self, direction: impl Into<String>) -> Self {
        self.order_direction = Some(direction.into());
        self
    }

    /// Filters are joined with `;` into a single `q` parameter.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.filters.is_empty() {
            pairs.push(("q", self.filters.join(";")));
        }
        if let Some(count) = self.results_per_page {
            pairs.push(("results-per-page", count.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(direction) = &self.order_direction {
            pairs.push(("order-direction", direction.clone()));
        }
        pairs
    }
}

/// Shared request plumbing for every API handle: base endpoint, HTTP client
/// and the token cell.
#[derive(Debug, Clone)]
pub struct ApiHandle {
    pub(crate) endpoint: String,
    pub(crate) client: Client,
    pub(crate) token: TokenCell,
}

impl ApiHandle {
    pub fn new(endpoint: &str, client: Client, token: TokenCell) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
            token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.endpoint, path)
    }

    /// Unauthenticated request.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Request carrying the current bearer token.
    pub fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, CfError> {
        let authorization = self.token.authorization().ok_or(CfError::NotAuthenticated)?;
        Ok(self
            .request(method, path)
            .header(reqwest::header::AUTHORIZATION, authorization))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> Result<T, CfError> {
        debug!(endpoint = %self.endpoint, path, "GET");
        let response = self
            .authorized(Method::GET, path)?
            .query(&query.to_pairs())
            .send()
            .await?;
        decode_json(response).await
    }
}

pub(crate) fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    description: Option<String>,
    error_description: Option<String>,
    error_code: Option<String>,
}

/// Maps non-success statuses to [`CfError::Api`] and decodes the body otherwise.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, CfError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CfError::Api {
            status: status.as_u16(),
            description: describe_error_body(&body),
        });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed
            .description
            .or(parsed.error_description)
            .or(parsed.error_code)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}
