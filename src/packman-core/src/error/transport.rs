use thiserror::Error;

// reqwest::Error's fmt::Display appends the error descriptions of all sources.
// For this reason, it is not marked as #[source] here, so that we don't
// display the error descriptions of all sources repeatedly.
#[derive(Error, Debug)]
#[error("{}", .0)]
pub struct WrappedReqwestError(pub reqwest::Error);

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to build HTTP client")]
    BuildClientFailed(#[source] WrappedReqwestError),

    #[error("Transport has already been closed")]
    Closed(),

    #[error("Invalid proxy '{0}'")]
    InvalidProxy(String, #[source] WrappedReqwestError),

    #[error("HTTP request failed")]
    RequestFailed(#[source] WrappedReqwestError),
}
