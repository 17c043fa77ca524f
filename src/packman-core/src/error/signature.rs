use crate::identity::key::KeyType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Failed to format the Date header")]
    FormatDateFailed(#[source] time::error::Format),

    #[error("Invalid value for header '{0}'")]
    InvalidHeaderValue(String, #[source] reqwest::header::InvalidHeaderValue),

    #[error("Header '{0}' is not valid visible ASCII")]
    NonAsciiHeader(String),

    #[error("Header '{0}' is required by the signature but missing from the request")]
    MissingHeader(String),

    #[error("Request URL '{0}' has no host")]
    MissingHost(String),

    #[error("Failed to sign with {0:?} key")]
    SigningFailed(KeyType),
}
