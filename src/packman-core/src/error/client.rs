use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build login URL from '{0}' and '{1}'")]
    InvalidLoginUrl(String, String, #[source] url::ParseError),
}
