//! Runs operations against a freshly logged-in package manager client.
use crate::client::{login, PackageManagerClient};
use crate::config::ClientConfig;
use crate::credentials::{domain_requirements, CredentialsProvider, DomainRequirement};
use crate::error::execute::ExecuteClientError;
use crate::error::execute::ExecuteClientError::{CreateClientFailed, CreateTransportFailed};
use crate::error::login::LoginError;
use crate::httpsig::Signer;
use crate::identity::{Keychain, UserFingerprintKeyId};
use crate::transport::{ReqwestTransportFactory, TransportFactory, TransportRelease};
use futures::future::BoxFuture;
use slog::{crit, debug, Logger};
use std::sync::Arc;


/// Receives diagnostics raised while preparing a client.
pub trait TaskListener: Send + Sync {
    fn fatal_error(&self, message: &str);
}

/// Reports fatal errors as critical log records.
pub struct LogTaskListener {
    log: Logger,
}

impl LogTaskListener {
    pub fn new(log: Logger) -> Self {
        Self { log }
    }
}

impl TaskListener for LogTaskListener {
    fn fatal_error(&self, message: &str) {
        crit!(self.log, "{}", message);
    }
}

pub struct ClientExecutor {
    log: Logger,
    transport_factory: Arc<dyn TransportFactory>,
    credentials: Arc<dyn CredentialsProvider>,
    listener: Arc<dyn TaskListener>,
}

impl ClientExecutor {
    pub fn new(log: Logger, credentials: Arc<dyn CredentialsProvider>) -> Self {
        Self {
            transport_factory: Arc::new(ReqwestTransportFactory::new(log.clone())),
            listener: Arc::new(LogTaskListener::new(log.clone())),
            credentials,
            log,
        }
    }

    pub fn with_transport_factory(mut self, factory: Arc<dyn TransportFactory>) -> Self {
        self.transport_factory = factory;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn TaskListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Creates a client for `config`, logs it in and hands it to `operation`.
    ///
    /// The client's transport is released exactly once whichever way this returns,
    /// including when the returned future is dropped early. Release is not awaited.
    /// A rejected login is reported to the listener and the operation still runs;
    /// only a login that could not complete is an error.
    ///
    /// The login handshake is spawned with `tokio::spawn`, so the returned future
    /// must be polled inside a Tokio runtime or it panics.
    pub async fn execute<T, E, F>(&self, config: &ClientConfig, operation: F) -> Result<T, E>
    where
        F: for<'a> FnOnce(&'a PackageManagerClient) -> BoxFuture<'a, Result<T, E>>,
        E: From<ExecuteClientError>,
    {
        let transport = self
            .transport_factory
            .new_transport(config)
            .map_err(CreateTransportFailed)?;
        let _release = TransportRelease::new(transport.clone());

        let client = PackageManagerClient::new(transport, config).map_err(CreateClientFailed)?;

        let requirements = domain_requirements(&config.base_url);
        let logged_in = self
            .login(config, &requirements, &client)
            .await
            .map_err(ExecuteClientError::from)?;
        if !logged_in {
            let passwords = self
                .credentials
                .lookup_username_passwords(&requirements, config.credentials_scope.as_deref());
            debug!(
                self.log,
                "{} username/password credentials available for {}.",
                passwords.len(),
                config.base_url
            );
            self.listener
                .fatal_error(&format!("Failed to login to {}", config.base_url));
        }

        operation(&client).await
    }

    async fn login(
        &self,
        config: &ClientConfig,
        requirements: &[DomainRequirement],
        client: &PackageManagerClient,
    ) -> Result<bool, LoginError> {
        let credentials = self
            .credentials
            .lookup_private_keys(requirements, config.credentials_scope.as_deref());
        let (keychain, identities) = Keychain::from_credentials(&self.log, &credentials);
        debug!(
            self.log,
            "Logging in to {} with {} candidate key(s).",
            client.base_url(),
            keychain.len()
        );

        let signer = Signer::new(
            Arc::new(keychain),
            Arc::new(UserFingerprintKeyId::new(Arc::new(identities))),
        );
        login::login(&self.log, client, signer).await
    }
}
