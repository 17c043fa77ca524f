//! Passphrase protection for private key material at rest.
//!
//! Encrypted key material is AES-256-GCM ciphertext whose key is derived from the
//! passphrase with Argon2id. The salt and nonce travel alongside the ciphertext in
//! an [`EncryptionConfiguration`].
use crate::error::encryption::EncryptionError;
use crate::error::encryption::EncryptionError::{
    DecryptContentFailed, EncryptContentFailed, HashPasswordFailed, InvalidNonce,
    MissingPasswordHash, NonceGenerationFailed, SaltGenerationFailed,
};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use argon2::{password_hash::PasswordHasher, Argon2};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

const NONCE_LEN: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionConfiguration {
    /// Salt used for deriving the key from the passphrase
    pub pw_salt: String,

    /// 96 bit Nonce used to decrypt the key material
    #[serde(with = "hex")]
    pub file_nonce: Vec<u8>,
}

impl EncryptionConfiguration {
    /// Generates a random salt and nonce. Use this for every newly encrypted key.
    pub fn new() -> Result<Self, EncryptionError> {
        let mut nonce: [u8; NONCE_LEN] = [0; NONCE_LEN];
        let mut salt: [u8; 32] = [0; 32];
        let sr = SystemRandom::new();
        sr.fill(&mut nonce).map_err(NonceGenerationFailed)?;
        sr.fill(&mut salt).map_err(SaltGenerationFailed)?;

        Ok(Self {
            pw_salt: hex::encode(salt),
            file_nonce: nonce.into(),
        })
    }
}

/// Encrypts plaintext PEM content under a fresh [`EncryptionConfiguration`].
pub fn encrypt_pem(
    pem_content: &[u8],
    passphrase: &str,
) -> Result<(Vec<u8>, EncryptionConfiguration), EncryptionError> {
    let config = EncryptionConfiguration::new()?;
    let encrypted = encrypt(pem_content, &config, passphrase)?;
    Ok((encrypted, config))
}

fn get_argon_params() -> Result<argon2::Params, EncryptionError> {
    argon2::Params::new(64000 /* in kb */, 3, 1, Some(32 /* in bytes */))
        .map_err(|err| HashPasswordFailed(err.into()))
}

fn check_nonce(config: &EncryptionConfiguration) -> Result<(), EncryptionError> {
    match config.file_nonce.len() {
        NONCE_LEN => Ok(()),
        actual => Err(InvalidNonce {
            expected: NONCE_LEN,
            actual,
        }),
    }
}

fn derive_cipher(
    config: &EncryptionConfiguration,
    password: &str,
) -> Result<Aes256Gcm, EncryptionError> {
    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        get_argon_params()?,
    );
    let hash = argon2
        .hash_password(password.as_bytes(), &config.pw_salt)
        .map_err(HashPasswordFailed)?;
    let output = hash.hash.ok_or(MissingPasswordHash())?;
    let key = Key::<Aes256Gcm>::clone_from_slice(output.as_ref());
    Ok(Aes256Gcm::new(&key))
}

pub(crate) fn encrypt(
    content: &[u8],
    config: &EncryptionConfiguration,
    password: &str,
) -> Result<Vec<u8>, EncryptionError> {
    check_nonce(config)?;
    let cipher = derive_cipher(config, password)?;
    let nonce = Nonce::from_slice(config.file_nonce.as_slice());

    cipher.encrypt(nonce, content).map_err(EncryptContentFailed)
}

pub(crate) fn decrypt(
    encrypted_content: &[u8],
    config: &EncryptionConfiguration,
    password: &str,
) -> Result<Vec<u8>, EncryptionError> {
    check_nonce(config)?;
    let cipher = derive_cipher(config, password)?;
    let nonce = Nonce::from_slice(config.file_nonce.as_slice());

    cipher
        .decrypt(nonce, encrypted_content)
        .map_err(DecryptContentFailed)
}
