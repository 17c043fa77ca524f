use crate::credentials::{PrivateKeyCredential, PrivateKeySource};
use crate::error::key::DecodeKeyError;
use crate::error::key::DecodeKeyError::{DecryptKeyFailed, MissingPassphrase, ReadKeyFileFailed};
use crate::identity::key::Key;
use crate::identity::pem_safekeeping;
use slog::{debug, Logger};
use std::collections::HashMap;

/// The keys available to a signer for one authentication attempt.
#[derive(Debug, Default)]
pub struct Keychain {
    keys: Vec<Key>,
}

impl Keychain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes every credential it can and pairs each key with its username.
    ///
    /// Credentials whose key material cannot be decoded are skipped.
    pub fn from_credentials(
        log: &Logger,
        credentials: &[PrivateKeyCredential],
    ) -> (Keychain, IdentityMap) {
        let mut keychain = Keychain::new();
        let mut usernames = HashMap::new();
        for credential in credentials {
            match decode_key(credential) {
                Ok(key) => {
                    let username = Some(credential.username.clone()).filter(|u| !u.is_empty());
                    usernames.insert(key.public_key().to_vec(), username);
                    keychain.add(key);
                }
                Err(err) => debug!(
                    log,
                    "Skipping private key for user '{}': {}", credential.username, err
                ),
            }
        }
        (keychain, IdentityMap { usernames })
    }

    /// Adds a key unless an identical key is already present.
    pub fn add(&mut self, key: Key) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.keys.iter().any(|k| k.public_key() == key.public_key())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Username known for each key of a [`Keychain`], keyed by public key.
#[derive(Clone, Debug, Default)]
pub struct IdentityMap {
    usernames: HashMap<Vec<u8>, Option<String>>,
}

impl IdentityMap {
    /// `None` both for unknown keys and for keys recorded without a username.
    pub fn username(&self, key: &Key) -> Option<&str> {
        self.usernames.get(key.public_key())?.as_deref()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.usernames.contains_key(key.public_key())
    }

    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }
}

fn decode_key(credential: &PrivateKeyCredential) -> Result<Key, DecodeKeyError> {
    let passphrase = credential.passphrase.as_deref();
    match &credential.private_key {
        PrivateKeySource::Pem(pem) => Key::decode(pem.as_bytes(), passphrase),
        PrivateKeySource::File(path) => {
            let pem = crate::fs::read(path).map_err(ReadKeyFileFailed)?;
            Key::decode(&pem, passphrase)
        }
        PrivateKeySource::Encrypted {
            content,
            encryption,
        } => {
            let passphrase = passphrase.ok_or(MissingPassphrase())?;
            let pem = pem_safekeeping::decrypt(content, encryption, passphrase)
                .map_err(DecryptKeyFailed)?;
            Key::from_pem(&pem)
        }
    }
}
