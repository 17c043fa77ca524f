//! The HTTP Signature login handshake.
//!
//! The login endpoint only accepts POST. A signed GET that gets as far as the
//! method check (405 Method Not Allowed) has had its signature accepted, so that
//! status is the success criterion. Any other status is a failed login.
use crate::client::PackageManagerClient;
use crate::error::login::LoginFailure::{RequestFailed, SignRequestFailed, TaskFailed, TimedOut};
use crate::error::login::{LoginError, LoginFailure};
use crate::httpsig::Signer;
use crate::transport::Transport;
use reqwest::{Method, Request, StatusCode};
use slog::{debug, trace, Logger};
use std::sync::Arc;
use tokio::task::AbortHandle;

pub const LOGIN_SUCCESS_STATUS: StatusCode = StatusCode::METHOD_NOT_ALLOWED;

/// Sends one signed GET to the client's login URL.
///
/// Waits at most the client's service timeout, or indefinitely when it has none.
/// Returns `Ok(false)` without sending anything when no key can sign.
/// The handshake runs on a spawned task, so this must be polled inside a Tokio runtime.
pub async fn login(
    log: &Logger,
    client: &PackageManagerClient,
    signer: Signer,
) -> Result<bool, LoginError> {
    let request = client.prepare(Method::GET, client.login_url().clone());
    let mut task = tokio::spawn(sign_and_send(
        log.clone(),
        signer,
        client.transport().clone(),
        request,
    ));
    let _abort = AbortOnDrop(task.abort_handle());

    let joined = match client.service_timeout() {
        Some(timeout) => match tokio::time::timeout(timeout, &mut task).await {
            Ok(joined) => joined,
            Err(elapsed) => return Err(TimedOut(elapsed).into()),
        },
        None => task.await,
    };
    joined.map_err(TaskFailed)?.map_err(LoginError::from)
}

/// Aborts the handshake task when the waiting side goes away, by timeout or cancellation.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn sign_and_send(
    log: Logger,
    signer: Signer,
    transport: Arc<dyn Transport>,
    mut request: Request,
) -> Result<bool, LoginFailure> {
    match signer.sign_request(&mut request).map_err(SignRequestFailed)? {
        Some(authorization) => debug!(
            log,
            "Signing login request as '{}' ({}).", authorization.key_id, authorization.algorithm
        ),
        None => {
            debug!(log, "No key in the keychain resolves to a signer identity.");
            return Ok(false);
        }
    }
    let response = transport.execute(request).await.map_err(RequestFailed)?;
    trace!(log, "login status code {}", response.status());
    Ok(response.status() == LOGIN_SUCCESS_STATUS)
}
