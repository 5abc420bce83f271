use thiserror::Error;

#[derive(Debug, Error)]
pub enum CfError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error (status={status}): {description}")]
    Api { status: u16, description: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("missing endpoint: {0}")]
    MissingEndpoint(&'static str),
}

impl CfError {
    /// Status code reported by the platform, if the failure came from an API response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the platform rejected the current token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}
