use crate::error::structured_file::StructuredFileError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_LOGIN_PATH: &str = "/crx/packmgr/j_security_check";
pub const DEFAULT_REQUEST_TIMEOUT_MS: i64 = 60_000;
pub const DEFAULT_SERVICE_TIMEOUT_MS: i64 = 60_000;
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 8;

/// Connection settings for one package manager client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: Url,

    /// Per-request timeout in milliseconds. Zero or less disables it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: i64,

    /// Maximum wait for the login handshake in milliseconds. Zero or less waits indefinitely.
    #[serde(default = "default_service_timeout")]
    pub service_timeout: i64,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Passed to the credentials provider to select scoped credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Url>,

    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

fn default_request_timeout() -> i64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_service_timeout() -> i64 {
    DEFAULT_SERVICE_TIMEOUT_MS
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_pool_max_idle_per_host() -> usize {
    DEFAULT_POOL_MAX_IDLE_PER_HOST
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_MS,
            service_timeout: DEFAULT_SERVICE_TIMEOUT_MS,
            login_path: default_login_path(),
            credentials_scope: None,
            proxy: None,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
        }
    }

    pub fn load(path: &Path) -> Result<Self, StructuredFileError> {
        crate::json::load_json_file(path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        positive_millis(self.request_timeout)
    }

    pub fn service_timeout(&self) -> Option<Duration> {
        positive_millis(self.service_timeout)
    }
}

pub(crate) fn positive_millis(millis: i64) -> Option<Duration> {
    u64::try_from(millis)
        .ok()
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn non_positive_timeouts_are_unbounded() {
        let mut config = ClientConfig::new(Url::parse("http://localhost:4502").unwrap());
        assert_eq!(config.service_timeout(), Some(Duration::from_secs(60)));

        config.service_timeout = 0;
        config.request_timeout = -1;
        assert_eq!(config.service_timeout(), None);
        assert_eq!(config.request_timeout(), None);

        config.service_timeout = 250;
        assert_eq!(config.service_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn loads_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(
            &path,
            r#"{ "base_url": "http://localhost:4502", "service_timeout": 0 }"#,
        )
        .unwrap();

        let config = ClientConfig::load(&path).unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:4502/");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.service_timeout, 0);
        assert_eq!(config.login_path, DEFAULT_LOGIN_PATH);
        assert_eq!(config.credentials_scope, None);
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
    }

    #[test]
    fn rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(&path, r#"{ "base_url": "not a url" }"#).unwrap();

        assert!(matches!(
            ClientConfig::load(&path),
            Err(StructuredFileError::DeserializeJsonFileFailed(..))
        ));
    }
}
