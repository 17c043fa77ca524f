use crate::error::signature::SignatureError;
use crate::error::transport::TransportError;
use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;

#[derive(Error, Debug)]
#[error("Failed to login using HTTP Signature")]
pub struct LoginError {
    #[from]
    pub source: LoginFailure,
}

#[derive(Error, Debug)]
pub enum LoginFailure {
    #[error("Login request failed")]
    RequestFailed(#[source] TransportError),

    #[error("Failed to sign the login request")]
    SignRequestFailed(#[source] SignatureError),

    #[error("Login task did not run to completion")]
    TaskFailed(#[source] JoinError),

    #[error("Timed out waiting for the login response")]
    TimedOut(#[source] Elapsed),
}
