use crate::identity::key::Key;
use crate::identity::keychain::IdentityMap;
use std::sync::Arc;

/// Names the identity a key signs as. `None` means the key must not be used for signing.
pub trait KeyId: Send + Sync {
    fn key_id(&self, key: &Key) -> Option<String>;
}

impl<F> KeyId for F
where
    F: Fn(&Key) -> Option<String> + Send + Sync,
{
    fn key_id(&self, key: &Key) -> Option<String> {
        self(key)
    }
}

/// Resolves keys to `/{username}/{fingerprint}`.
#[derive(Clone, Debug)]
pub struct UserFingerprintKeyId {
    usernames: Arc<IdentityMap>,
}

impl UserFingerprintKeyId {
    pub fn new(usernames: Arc<IdentityMap>) -> Self {
        Self { usernames }
    }
}

impl KeyId for UserFingerprintKeyId {
    fn key_id(&self, key: &Key) -> Option<String> {
        let fingerprint = key.fingerprint()?;
        let username = self.usernames.username(key).filter(|u| !u.is_empty())?;
        Some(format!("/{username}/{fingerprint}"))
    }
}
