//! Environment-driven session configuration.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::crypto::decrypt_password;
use crate::error::{Result, SessionError};
use crate::keepalive::TOKEN_REFRESH_PERIOD;

pub const ENV_API: &str = "HUBOT_BLUEMIX_API";
pub const ENV_ORG: &str = "HUBOT_BLUEMIX_ORG";
pub const ENV_SPACE: &str = "HUBOT_BLUEMIX_SPACE";
pub const ENV_USER: &str = "HUBOT_BLUEMIX_USER";
pub const ENV_PASSWORD: &str = "HUBOT_BLUEMIX_PASSWORD";
pub const ENV_SALT: &str = "HUBOT_BLUEMIX_SALT";
pub const ENV_TOKEN_REFRESH_SECS: &str = "HUBOT_BLUEMIX_TOKEN_REFRESH_SECS";

/// Settings needed to open a session. The password held here is always the
/// plaintext login password.
#[derive(Clone)]
pub struct CfConfig {
    pub endpoint: String,
    pub org_name: String,
    pub space_name: String,
    pub username: String,
    password: String,
    pub token_refresh_period: Duration,
}

impl CfConfig {
    pub fn new(
        endpoint: impl Into<String>,
        org_name: impl Into<String>,
        space_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            org_name: org_name.into(),
            space_name: space_name.into(),
            username: username.into(),
            password: password.into(),
            token_refresh_period: TOKEN_REFRESH_PERIOD,
        }
    }

    /// Treats the configured password as ciphertext encrypted under `salt`.
    pub fn with_salt(mut self, salt: &str) -> Result<Self> {
        self.password = decrypt_password(&self.password, Some(salt))?;
        Ok(self)
    }

    pub fn with_token_refresh_period(mut self, period: Duration) -> Self {
        self.token_refresh_period = period;
        self
    }

    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| SessionError::config(format!("{} is not set", key)))
        };

        let endpoint = require(ENV_API)?;
        Url::parse(&endpoint)
            .map_err(|e| SessionError::config(format!("{} is not a valid URL: {}", ENV_API, e)))?;

        let mut config = Self::new(
            endpoint,
            require(ENV_ORG)?,
            require(ENV_SPACE)?,
            require(ENV_USER)?,
            require(ENV_PASSWORD)?,
        );

        if let Some(salt) = lookup(ENV_SALT).filter(|s| !s.is_empty()) {
            config = config.with_salt(&salt)?;
        }

        if let Some(secs) = lookup(ENV_TOKEN_REFRESH_SECS) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                SessionError::config(format!("{} must be a number of seconds", ENV_TOKEN_REFRESH_SECS))
            })?;
            if secs == 0 {
                return Err(SessionError::config(format!(
                    "{} must be greater than zero",
                    ENV_TOKEN_REFRESH_SECS
                )));
            }
            config.token_refresh_period = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Loggregator endpoint derived from the API endpoint.
    pub fn log_endpoint(&self) -> String {
        self.endpoint.replacen("/api", "/loggregator", 1)
    }
}

impl fmt::Debug for CfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CfConfig")
            .field("endpoint", &self.endpoint)
            .field("org_name", &self.org_name)
            .field("space_name", &self.space_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("token_refresh_period", &self.token_refresh_period)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_API, "https://api.ng.bluemix.net"),
            (ENV_ORG, "acme"),
            (ENV_SPACE, "dev"),
            (ENV_USER, "bot@example.com"),
            (ENV_PASSWORD, "hunter2"),
        ]
    }

    #[test]
    fn test_reads_required_variables() {
        let config = CfConfig::from_lookup(env(&base())).unwrap();
        assert_eq!(config.org_name, "acme");
        assert_eq!(config.space_name, "dev");
        assert_eq!(config.password(), "hunter2");
        assert_eq!(config.token_refresh_period, TOKEN_REFRESH_PERIOD);
    }

    #[test]
    fn test_missing_variable_is_named() {
        let vars: Vec<_> = base().into_iter().filter(|(k, _)| *k != ENV_SPACE).collect();
        let err = CfConfig::from_lookup(env(&vars)).unwrap_err();
        assert!(err.to_string().contains(ENV_SPACE));
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut vars = base();
        vars[0] = (ENV_API, "api.ng.bluemix.net");
        assert!(matches!(
            CfConfig::from_lookup(env(&vars)),
            Err(SessionError::Configuration(_))
        ));
    }

    #[test]
    fn test_salt_decrypts_password() {
        let mut vars = base();
        vars[4] = (ENV_PASSWORD, "VQQ//oGrFJMmxaS5PGNLxQ==");
        vars.push((ENV_SALT, "hubot-salt"));
        let config = CfConfig::from_lookup(env(&vars)).unwrap();
        assert_eq!(config.password(), "passw0rd!");
    }

    #[test]
    fn test_refresh_period_override() {
        let mut vars = base();
        vars.push((ENV_TOKEN_REFRESH_SECS, "60"));
        let config = CfConfig::from_lookup(env(&vars)).unwrap();
        assert_eq!(config.token_refresh_period, Duration::from_secs(60));

        let mut vars = base();
        vars.push((ENV_TOKEN_REFRESH_SECS, "0"));
        assert!(CfConfig::from_lookup(env(&vars)).is_err());
    }

    #[test]
    fn test_log_endpoint_and_redaction() {
        let config = CfConfig::new(
            "https://api.ng.bluemix.net",
            "acme",
            "dev",
            "bot",
            "hunter2",
        );
        assert_eq!(config.log_endpoint(), "https://loggregator.ng.bluemix.net");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
