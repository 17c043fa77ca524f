//! HTTP Signature request authentication.
//!
//! Requests are signed over a signing string built from `(request-target)` and a
//! list of request headers, then carry an `Authorization: Signature ...` header
//! naming the key id, the algorithm and the signed headers.
use crate::error::signature::SignatureError;
use reqwest::Request;
use std::fmt;

pub mod signer;

pub use signer::Signer;

pub const REQUEST_TARGET: &str = "(request-target)";

/// Headers covered by a login signature, in signing order.
pub const DEFAULT_HEADERS: &[&str] = &[REQUEST_TARGET, "host", "date"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Ed25519,
    EcdsaSha256,
    EcdsaSecp256k1Sha256,
    RsaSha256,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Ed25519 => "ed25519",
            Algorithm::EcdsaSha256 => "ecdsa-sha256",
            Algorithm::EcdsaSecp256k1Sha256 => "ecdsa-secp256k1-sha256",
            Algorithm::RsaSha256 => "rsa-sha256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parameters of a `Signature` authorization header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization {
    pub key_id: String,
    pub algorithm: Algorithm,
    pub headers: Vec<String>,
    pub signature: Vec<u8>,
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature keyId=\"{}\",algorithm=\"{}\",headers=\"{}\",signature=\"{}\"",
            self.key_id,
            self.algorithm,
            self.headers.join(" "),
            base64::encode(&self.signature)
        )
    }
}

/// Builds the string a signature is computed over.
///
/// Each line is `name: value` with the header name lowercased; the pseudo header
/// `(request-target)` expands to the lowercased method and the path with query.
pub fn signing_string(request: &Request, headers: &[&str]) -> Result<String, SignatureError> {
    let mut lines = Vec::with_capacity(headers.len());
    for name in headers {
        let name = name.to_ascii_lowercase();
        let value = if name == REQUEST_TARGET {
            request_target(request)
        } else {
            let values = request.headers().get_all(name.as_str());
            let mut joined = Vec::new();
            for value in values.iter() {
                let value = value
                    .to_str()
                    .map_err(|_| SignatureError::NonAsciiHeader(name.clone()))?;
                joined.push(value.trim().to_string());
            }
            if joined.is_empty() {
                return Err(SignatureError::MissingHeader(name));
            }
            joined.join(", ")
        };
        lines.push(format!("{name}: {value}"));
    }
    Ok(lines.join("\n"))
}

fn request_target(request: &Request) -> String {
    let url = request.url();
    let mut target = format!(
        "{} {}",
        request.method().as_str().to_ascii_lowercase(),
        url.path()
    );
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    target
}
