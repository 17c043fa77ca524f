//! HTTP transport used by the package manager client.
//!
//! A transport is created per `execute` call by a [`TransportFactory`] and released
//! through a [`TransportRelease`] guard. Release is requested, never awaited.
use crate::config::ClientConfig;
use crate::error::transport::{TransportError, WrappedReqwestError};
use futures::future::{self, BoxFuture, FutureExt};
use reqwest::{Request, Response};
use slog::{debug, trace, Logger};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

pub trait Transport: Send + Sync {
    fn execute(&self, request: Request) -> BoxFuture<'static, Result<Response, TransportError>>;

    /// Starts releasing pooled connections without waiting for it to finish.
    fn close_asynchronously(&self);
}

pub trait TransportFactory: Send + Sync {
    fn new_transport(&self, config: &ClientConfig) -> Result<Arc<dyn Transport>, TransportError>;
}

/// A [`Transport`] over a pooled `reqwest::Client`.
pub struct ReqwestTransport {
    log: Logger,
    client: Mutex<Option<reqwest::Client>>,
}

impl ReqwestTransport {
    pub fn new(log: Logger, client: reqwest::Client) -> Self {
        Self {
            log,
            client: Mutex::new(Some(client)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: Request) -> BoxFuture<'static, Result<Response, TransportError>> {
        let client = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match client {
            Some(client) => async move {
                client
                    .execute(request)
                    .await
                    .map_err(|err| TransportError::RequestFailed(WrappedReqwestError(err)))
            }
            .boxed(),
            None => future::ready(Err(TransportError::Closed())).boxed(),
        }
    }

    fn close_asynchronously(&self) {
        let client = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(client) = client else {
            return;
        };
        debug!(self.log, "Closing HTTP transport.");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let log = self.log.clone();
                handle.spawn(async move {
                    drop(client);
                    trace!(log, "HTTP transport closed.");
                });
            }
            Err(_) => drop(client),
        }
    }
}

/// Builds a [`ReqwestTransport`] per client configuration.
pub struct ReqwestTransportFactory {
    log: Logger,
}

impl ReqwestTransportFactory {
    pub fn new(log: Logger) -> Self {
        Self { log }
    }
}

impl TransportFactory for ReqwestTransportFactory {
    fn new_transport(&self, config: &ClientConfig) -> Result<Arc<dyn Transport>, TransportError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(config.pool_max_idle_per_host);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy.clone()).map_err(|err| {
                TransportError::InvalidProxy(proxy.to_string(), WrappedReqwestError(err))
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::BuildClientFailed(WrappedReqwestError(err)))?;
        Ok(Arc::new(ReqwestTransport::new(self.log.clone(), client)))
    }
}

/// Requests release of a transport when dropped.
pub struct TransportRelease {
    transport: Arc<dyn Transport>,
}

impl TransportRelease {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl Drop for TransportRelease {
    fn drop(&mut self) {
        self.transport.close_asynchronously();
    }
}
