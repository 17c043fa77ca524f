pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod fs;
pub mod httpsig;
pub mod identity;
pub mod json;
pub mod logger;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::PackageManagerClient;
pub use config::ClientConfig;
pub use executor::{ClientExecutor, LogTaskListener, TaskListener};
