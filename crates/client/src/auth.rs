//! HMAC-SHA512 request signing for private channels.

use gatews_core::{Auth, AuthMethod, Request};
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// An API key and its secret.
#[derive(Clone)]
pub struct ApiCredentials {
    key: String,
    secret: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl ApiCredentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Both halves must be present and non-empty.
    pub fn from_parts(key: Option<&str>, secret: Option<&str>) -> Option<Self> {
        match (key, secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(Self::new(key, secret))
            }
            _ => None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Hex-encoded HMAC-SHA512 of `message` keyed by the secret.
    pub fn sign(&self, message: &str) -> String {
        // HMAC accepts keys of any length
        let mut mac = HmacSha512::new_from_slice(self.secret.as_bytes())
            .expect("HMAC-SHA512 accepts keys of any length");
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Build the `auth` block for a request.
    pub fn authorize(&self, request: &Request) -> Auth {
        Auth {
            method: AuthMethod::ApiKey,
            key: self.key.clone(),
            sign: self.sign(&request.signature_payload()),
        }
    }
}
