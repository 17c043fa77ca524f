use crate::config::{positive_millis, ClientConfig};
use crate::error::client::ClientError;
use crate::error::transport::TransportError;
use crate::transport::Transport;
use reqwest::{Method, Request, Response};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub mod login;

/// A package manager client bound to one service base URL.
pub struct PackageManagerClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    login_url: Url,
    request_timeout: i64,
    service_timeout: i64,
}

impl PackageManagerClient {
    pub fn new(transport: Arc<dyn Transport>, config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            transport,
            base_url: config.base_url.clone(),
            login_url: join_path(&config.base_url, &config.login_path)?,
            request_timeout: config.request_timeout,
            service_timeout: config.service_timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        positive_millis(self.request_timeout)
    }

    pub fn service_timeout(&self) -> Option<Duration> {
        positive_millis(self.service_timeout)
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// A request against this client's service, carrying the per-request timeout.
    pub fn prepare(&self, method: Method, url: Url) -> Request {
        let mut request = Request::new(method, url);
        *request.timeout_mut() = self.request_timeout();
        request
    }

    pub async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        self.transport.execute(request).await
    }
}

/// Appends `path` to `base`, keeping any path the base URL already has.
fn join_path(base: &Url, path: &str) -> Result<Url, ClientError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined)
        .map_err(|err| ClientError::InvalidLoginUrl(base.to_string(), path.to_string(), err))
}
