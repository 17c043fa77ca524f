use crate::error::signature::SignatureError;
use crate::httpsig::{signing_string, Authorization, DEFAULT_HEADERS};
use crate::identity::{Key, KeyId, Keychain};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, DATE, HOST};
use reqwest::Request;
use std::sync::Arc;
use time::macros::format_description;
use time::OffsetDateTime;

/// Signs requests with the first keychain key that resolves to an identity.
#[derive(Clone)]
pub struct Signer {
    keychain: Arc<Keychain>,
    key_id: Arc<dyn KeyId>,
}

impl Signer {
    pub fn new(keychain: Arc<Keychain>, key_id: Arc<dyn KeyId>) -> Self {
        Self { keychain, key_id }
    }

    pub fn keychain(&self) -> &Keychain {
        &self.keychain
    }

    /// The key that would sign the next request, with its key id.
    pub fn select_key(&self) -> Option<(&Key, String)> {
        self.keychain
            .iter()
            .find_map(|key| self.key_id.key_id(key).map(|id| (key, id)))
    }

    /// Adds `Host`, `Date` (when absent) and `Authorization` headers to the request.
    ///
    /// Returns `Ok(None)` and leaves the request untouched when no key resolves to an identity.
    pub fn sign_request(
        &self,
        request: &mut Request,
    ) -> Result<Option<Authorization>, SignatureError> {
        let Some((key, key_id)) = self.select_key() else {
            return Ok(None);
        };

        let host = host_header(request)?;
        insert_header(request, HOST, &host)?;
        if !request.headers().contains_key(DATE) {
            insert_header(request, DATE, &http_date(OffsetDateTime::now_utc())?)?;
        }

        let signing_string = signing_string(request, DEFAULT_HEADERS)?;
        let authorization = Authorization {
            key_id,
            algorithm: key.algorithm(),
            headers: DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
            signature: key.sign(signing_string.as_bytes())?,
        };
        insert_header(request, AUTHORIZATION, &authorization.to_string())?;
        Ok(Some(authorization))
    }
}

fn host_header(request: &Request) -> Result<String, SignatureError> {
    let url = request.url();
    let host = url
        .host_str()
        .ok_or_else(|| SignatureError::MissingHost(url.to_string()))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn insert_header(
    request: &mut Request,
    name: HeaderName,
    value: &str,
) -> Result<(), SignatureError> {
    let value = HeaderValue::from_str(value)
        .map_err(|err| SignatureError::InvalidHeaderValue(name.to_string(), err))?;
    request.headers_mut().insert(name, value);
    Ok(())
}

fn http_date(now: OffsetDateTime) -> Result<String, SignatureError> {
    now.format(format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    ))
    .map_err(SignatureError::FormatDateFailed)
}
