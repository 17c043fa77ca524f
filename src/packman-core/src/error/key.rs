use crate::error::encryption::EncryptionError;
use crate::error::fs::ReadFileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeKeyError {
    #[error("Failed to decrypt private key material")]
    DecryptKeyFailed(#[source] EncryptionError),

    #[error("Failed to decrypt OpenSSH private key")]
    DecryptOpenSshFailed(#[source] ssh_key::Error),

    #[error("Failed to decrypt PKCS#8 private key")]
    DecryptPkcs8Failed(#[source] pkcs8::Error),

    #[error("Legacy 'Proc-Type: 4,ENCRYPTED' PEM keys are not supported")]
    LegacyPemEncryption(),

    #[error("Private key material is encrypted but no passphrase was supplied")]
    MissingPassphrase(),

    #[error("Failed to parse OpenSSH private key")]
    ParseOpenSshFailed(#[source] ssh_key::Error),

    #[error("Failed to parse PEM content")]
    ParsePemFailed(#[source] pem::PemError),

    #[error("Failed to read private key file")]
    ReadKeyFileFailed(#[source] ReadFileError),

    #[error("'{0}' is not a supported private key")]
    UnsupportedKey(String),
}
