//! Credentials eligible for a target URL.
//!
//! The executor asks a [`CredentialsProvider`] for private keys (and, after a failed
//! login, for username/password pairs) matching the domain requirements of the
//! client's base URL. [`CredentialsStore`] is a provider backed by a JSON document.
use crate::error::structured_file::StructuredFileError;
use crate::identity::pem_safekeeping::EncryptionConfiguration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

mod domain;

pub use domain::{domain_requirements, CredentialDomain, DomainRequirement};

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivateKeySource {
    /// PEM text held directly in the credential.
    Pem(String),

    /// A PEM file on disk.
    File(PathBuf),

    /// PEM content encrypted with the credential's passphrase.
    Encrypted {
        #[serde(with = "hex")]
        content: Vec<u8>,
        encryption: EncryptionConfiguration,
    },
}

impl fmt::Debug for PrivateKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKeySource::Pem(_) => f.write_str("Pem(..)"),
            PrivateKeySource::File(path) => f.debug_tuple("File").field(path).finish(),
            PrivateKeySource::Encrypted { .. } => f.write_str("Encrypted { .. }"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PrivateKeyCredential {
    pub username: String,
    pub private_key: PrivateKeySource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

impl PrivateKeyCredential {
    pub fn pem(username: &str, pem: &str) -> Self {
        Self {
            username: username.to_string(),
            private_key: PrivateKeySource::Pem(pem.to_string()),
            passphrase: None,
        }
    }
}

impl fmt::Debug for PrivateKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyCredential")
            .field("username", &self.username)
            .field("private_key", &self.private_key)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "********"))
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UsernamePasswordCredential {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for UsernamePasswordCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernamePasswordCredential")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

pub trait CredentialsProvider: Send + Sync {
    fn lookup_private_keys(
        &self,
        requirements: &[DomainRequirement],
        scope: Option<&str>,
    ) -> Vec<PrivateKeyCredential>;

    fn lookup_username_passwords(
        &self,
        requirements: &[DomainRequirement],
        scope: Option<&str>,
    ) -> Vec<UsernamePasswordCredential>;
}

/// Credentials valid for one [`CredentialDomain`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsEntry {
    pub domain: CredentialDomain,

    /// Restricts the entry to lookups made with this scope. Unscoped entries are always visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    pub private_keys: Vec<PrivateKeyCredential>,
    pub username_passwords: Vec<UsernamePasswordCredential>,
}

impl CredentialsEntry {
    fn applies_to(&self, requirements: &[DomainRequirement], scope: Option<&str>) -> bool {
        let in_scope = match &self.scope {
            None => true,
            Some(own) => scope == Some(own.as_str()),
        };
        in_scope && self.domain.matches(requirements)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CredentialsStore {
    #[serde(default)]
    pub entries: Vec<CredentialsEntry>,
}

impl CredentialsStore {
    pub fn new(entries: Vec<CredentialsEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, StructuredFileError> {
        crate::json::load_json_file(path)
    }

    fn matching<'a>(
        &'a self,
        requirements: &'a [DomainRequirement],
        scope: Option<&'a str>,
    ) -> impl Iterator<Item = &'a CredentialsEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.applies_to(requirements, scope))
    }
}

impl CredentialsProvider for CredentialsStore {
    fn lookup_private_keys(
        &self,
        requirements: &[DomainRequirement],
        scope: Option<&str>,
    ) -> Vec<PrivateKeyCredential> {
        self.matching(requirements, scope)
            .flat_map(|entry| entry.private_keys.iter().cloned())
            .collect()
    }

    fn lookup_username_passwords(
        &self,
        requirements: &[DomainRequirement],
        scope: Option<&str>,
    ) -> Vec<UsernamePasswordCredential> {
        self.matching(requirements, scope)
            .flat_map(|entry| entry.username_passwords.iter().cloned())
            .collect()
    }
}
