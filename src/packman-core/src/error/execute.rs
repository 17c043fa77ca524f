use crate::error::client::ClientError;
use crate::error::login::LoginError;
use crate::error::transport::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecuteClientError {
    #[error("Failed to create package manager client")]
    CreateClientFailed(#[source] ClientError),

    #[error("Failed to create HTTP transport")]
    CreateTransportFailed(#[source] TransportError),

    #[error(transparent)]
    LoginFailed(#[from] LoginError),
}
