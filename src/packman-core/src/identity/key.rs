use crate::error::key::DecodeKeyError;
use crate::error::key::DecodeKeyError::{
    DecryptOpenSshFailed, DecryptPkcs8Failed, LegacyPemEncryption, MissingPassphrase,
    ParseOpenSshFailed, ParsePemFailed, UnsupportedKey,
};
use crate::error::signature::SignatureError;
use crate::httpsig::Algorithm;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::pkcs8::DecodePrivateKey;
use pkcs8::EncryptedPrivateKeyInfo;
use ring::rand::SystemRandom;
use ring::rsa::PublicKeyComponents;
use ring::signature::{
    EcdsaKeyPair, Ed25519KeyPair, KeyPair, RsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
    RSA_PKCS1_SHA256,
};
use ssh_key::private::KeypairData;
use ssh_key::public::{EcdsaPublicKey, Ed25519PublicKey, KeyData, RsaPublicKey};
use ssh_key::{EcdsaCurve, HashAlg, Mpint, PrivateKey, PublicKey};
use std::fmt;

const PKCS8_TAG: &str = "PRIVATE KEY";
const ENCRYPTED_PKCS8_TAG: &str = "ENCRYPTED PRIVATE KEY";
const PKCS1_RSA_TAG: &str = "RSA PRIVATE KEY";
const SEC1_EC_TAG: &str = "EC PRIVATE KEY";
const OPENSSH_TAG: &str = "OPENSSH PRIVATE KEY";
const LEGACY_ENCRYPTION_HEADER: &[u8] = b"Proc-Type: 4,ENCRYPTED";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyType {
    Ed25519,
    EcdsaP256,
    Rsa,
    Secp256k1,
}

enum KeyPairInner {
    Ed25519(Ed25519KeyPair),
    EcdsaP256(EcdsaKeyPair),
    Rsa(RsaKeyPair),
    Secp256k1(k256::ecdsa::SigningKey),
}

/// A private key that can sign HTTP requests.
pub struct Key {
    inner: KeyPairInner,
    public_key: Vec<u8>,
    ssh_public_key: Option<PublicKey>,
}

impl Key {
    /// Decodes an unencrypted PEM or OpenSSH private key.
    pub fn from_pem(pem_content: &[u8]) -> Result<Self, DecodeKeyError> {
        Self::decode(pem_content, None)
    }

    /// Decodes a PEM or OpenSSH private key, decrypting it with `passphrase` when it is encrypted.
    ///
    /// PKCS#8 keys may hold Ed25519, ECDSA P-256, RSA or secp256k1 material and may be
    /// password protected (`ENCRYPTED PRIVATE KEY`). PKCS#1 RSA and SEC1 secp256k1 keys
    /// are accepted unencrypted. OpenSSH keys may hold Ed25519 or ECDSA P-256 material.
    /// The passphrase is ignored for unencrypted material.
    pub fn decode(material: &[u8], passphrase: Option<&str>) -> Result<Self, DecodeKeyError> {
        if material
            .windows(LEGACY_ENCRYPTION_HEADER.len())
            .any(|window| window == LEGACY_ENCRYPTION_HEADER)
        {
            return Err(LegacyPemEncryption());
        }

        let pem = pem::parse(material).map_err(ParsePemFailed)?;
        let der = pem.contents.as_slice();
        let inner = match pem.tag.as_str() {
            OPENSSH_TAG => return Self::from_openssh(material, passphrase),
            ENCRYPTED_PKCS8_TAG => {
                let passphrase = passphrase.ok_or(MissingPassphrase())?;
                let document = EncryptedPrivateKeyInfo::try_from(der)
                    .and_then(|info| info.decrypt(passphrase))
                    .map_err(DecryptPkcs8Failed)?;
                Self::from_pkcs8(document.as_bytes())
            }
            PKCS8_TAG => Self::from_pkcs8(der),
            PKCS1_RSA_TAG => RsaKeyPair::from_der(der).ok().map(KeyPairInner::Rsa),
            SEC1_EC_TAG => k256::SecretKey::from_sec1_der(der)
                .ok()
                .map(|secret| KeyPairInner::Secp256k1(secret.into())),
            _ => None,
        }
        .ok_or_else(|| UnsupportedKey(pem.tag.clone()))?;

        Ok(Self::new(inner))
    }

    fn from_pkcs8(der: &[u8]) -> Option<KeyPairInner> {
        if let Ok(key) = Ed25519KeyPair::from_pkcs8_maybe_unchecked(der) {
            return Some(KeyPairInner::Ed25519(key));
        }
        let rng = SystemRandom::new();
        if let Ok(key) = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, der, &rng) {
            return Some(KeyPairInner::EcdsaP256(key));
        }
        if let Ok(key) = RsaKeyPair::from_pkcs8(der) {
            return Some(KeyPairInner::Rsa(key));
        }
        k256::SecretKey::from_pkcs8_der(der)
            .ok()
            .map(|secret| KeyPairInner::Secp256k1(secret.into()))
    }

    fn from_openssh(material: &[u8], passphrase: Option<&str>) -> Result<Self, DecodeKeyError> {
        let mut private = PrivateKey::from_openssh(material).map_err(ParseOpenSshFailed)?;
        if private.is_encrypted() {
            let passphrase = passphrase.ok_or(MissingPassphrase())?;
            private = private.decrypt(passphrase).map_err(DecryptOpenSshFailed)?;
        }

        let inner = match private.key_data() {
            KeypairData::Ed25519(pair) => Ed25519KeyPair::from_seed_and_public_key(
                &pair.private.to_bytes(),
                &pair.public.0,
            )
            .ok()
            .map(KeyPairInner::Ed25519),
            KeypairData::Ecdsa(pair) if pair.curve() == EcdsaCurve::NistP256 => {
                EcdsaKeyPair::from_private_key_and_public_key(
                    &ECDSA_P256_SHA256_ASN1_SIGNING,
                    pair.private_key_bytes(),
                    pair.public_key_bytes(),
                    &SystemRandom::new(),
                )
                .ok()
                .map(KeyPairInner::EcdsaP256)
            }
            _ => None,
        }
        .ok_or_else(|| UnsupportedKey(private.algorithm().to_string()))?;

        Ok(Self::new(inner))
    }

    fn new(inner: KeyPairInner) -> Self {
        let public_key = match &inner {
            KeyPairInner::Ed25519(key) => key.public_key().as_ref().to_vec(),
            KeyPairInner::EcdsaP256(key) => key.public_key().as_ref().to_vec(),
            KeyPairInner::Rsa(key) => key.public().as_ref().to_vec(),
            KeyPairInner::Secp256k1(key) => key
                .verifying_key()
                .to_encoded_point(true)
                .as_bytes()
                .to_vec(),
        };
        let ssh_public_key = ssh_key_data(&inner, &public_key).map(PublicKey::from);
        Self {
            inner,
            public_key,
            ssh_public_key,
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self.inner {
            KeyPairInner::Ed25519(_) => KeyType::Ed25519,
            KeyPairInner::EcdsaP256(_) => KeyType::EcdsaP256,
            KeyPairInner::Rsa(_) => KeyType::Rsa,
            KeyPairInner::Secp256k1(_) => KeyType::Secp256k1,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self.key_type() {
            KeyType::Ed25519 => Algorithm::Ed25519,
            KeyType::EcdsaP256 => Algorithm::EcdsaSha256,
            KeyType::Rsa => Algorithm::RsaSha256,
            KeyType::Secp256k1 => Algorithm::EcdsaSecp256k1Sha256,
        }
    }

    /// The encoded public half of this key. Two keys are the same key iff these bytes match.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// The OpenSSH public key, for key types OpenSSH can represent.
    pub fn ssh_public_key(&self) -> Option<&PublicKey> {
        self.ssh_public_key.as_ref()
    }

    /// The SHA-256 fingerprint in `ssh-keygen -l` form, e.g. `SHA256:nXJ1EsSI/TpcW4...`.
    ///
    /// `None` for key types without an SSH public key encoding.
    pub fn fingerprint(&self) -> Option<String> {
        self.ssh_public_key
            .as_ref()
            .map(|key| key.fingerprint(HashAlg::Sha256).to_string())
    }

    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let failed = || SignatureError::SigningFailed(self.key_type());
        match &self.inner {
            KeyPairInner::Ed25519(key) => Ok(key.sign(data).as_ref().to_vec()),
            KeyPairInner::EcdsaP256(key) => key
                .sign(&SystemRandom::new(), data)
                .map(|signature| signature.as_ref().to_vec())
                .map_err(|_| failed()),
            KeyPairInner::Rsa(key) => {
                let mut signature = vec![0; key.public().modulus_len()];
                key.sign(&RSA_PKCS1_SHA256, &SystemRandom::new(), data, &mut signature)
                    .map_err(|_| failed())?;
                Ok(signature)
            }
            KeyPairInner::Secp256k1(key) => {
                use k256::ecdsa::signature::Signer;
                let signature: k256::ecdsa::Signature =
                    key.try_sign(data).map_err(|_| failed())?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }
}

fn ssh_key_data(inner: &KeyPairInner, public_key: &[u8]) -> Option<KeyData> {
    match inner {
        KeyPairInner::Ed25519(_) => Ed25519PublicKey::try_from(public_key)
            .ok()
            .map(KeyData::Ed25519),
        KeyPairInner::EcdsaP256(_) => EcdsaPublicKey::from_sec1_bytes(public_key)
            .ok()
            .map(KeyData::Ecdsa),
        KeyPairInner::Rsa(key) => {
            let components = PublicKeyComponents::<Vec<u8>>::from(key.public());
            Some(KeyData::Rsa(RsaPublicKey {
                e: Mpint::from_positive_bytes(&components.e).ok()?,
                n: Mpint::from_positive_bytes(&components.n).ok()?,
            }))
        }
        KeyPairInner::Secp256k1(_) => None,
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("key_type", &self.key_type())
            .field("public_key", &hex::encode(&self.public_key))
            .finish()
    }
}
