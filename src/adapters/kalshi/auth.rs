//! Kalshi Authentication — RSA-PSS Request Signing
//!
//! Signs every Kalshi API request per the venue's API-key scheme:
//! the message `timestamp_ms + HTTP_METHOD + path` (query string
//! stripped, timestamp in decimal milliseconds) is signed with
//! RSA-PSS using SHA-256 for both the digest and the MGF1 mask, salt
//! length equal to the digest length, and the signature is
//! base64-encoded. Credentials come from environment variables
//! (KALSHI_API_KEY_ID, KALSHI_PRIVATE_KEY_PATH).

use anyhow::{Context, Result};
use base64::Engine;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::pss::SigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use sha2::Sha256;
use tracing::info;

/// Kalshi API authentication handler.
///
/// Holds the access-key identifier and the RSA signing key loaded
/// from a PEM file. The private key never leaves this struct; only
/// computed signatures are attached to requests.
pub struct KalshiAuth {
    /// Access key ID from KALSHI_API_KEY_ID.
    api_key_id: String,
    /// PSS signing key. `SigningKey::new` fixes the salt length to
    /// the SHA-256 digest length, as the venue requires.
    signing_key: SigningKey<Sha256>,
}

impl KalshiAuth {
    /// Build from an already-parsed private key.
    pub fn new(api_key_id: String, private_key: RsaPrivateKey) -> Self {
        Self {
            api_key_id,
            signing_key: SigningKey::new(private_key),
        }
    }

    /// Load credentials from environment variables.
    ///
    /// Required env vars: KALSHI_API_KEY_ID and KALSHI_PRIVATE_KEY_PATH
    /// (path to a PEM private key, pkcs8 or pkcs1). These MUST come
    /// from `.env` or the environment — never committed to git.
    pub fn from_env() -> Result<Self> {
        let api_key_id =
            std::env::var("KALSHI_API_KEY_ID").context("KALSHI_API_KEY_ID not set")?;
        let key_path = std::env::var("KALSHI_PRIVATE_KEY_PATH")
            .context("KALSHI_PRIVATE_KEY_PATH not set")?;

        let pem = std::fs::read_to_string(&key_path)
            .with_context(|| format!("Failed to read private key file: {key_path}"))?;
        let auth = Self::from_pem(api_key_id, &pem)?;

        info!("Private key loaded successfully");
        Ok(auth)
    }

    /// Parse a PEM private key (pkcs8 first, pkcs1 fallback).
    pub fn from_pem(api_key_id: String, pem: &str) -> Result<Self> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .context("Failed to parse RSA private key PEM")?;
        Ok(Self::new(api_key_id, private_key))
    }

    /// Access key ID for request headers.
    pub fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    /// Current epoch time in milliseconds as a decimal string.
    pub fn timestamp_ms() -> String {
        chrono::Utc::now().timestamp_millis().to_string()
    }

    /// Build the exact message the venue expects to be signed.
    ///
    /// `timestamp_ms + METHOD + path`, where the path excludes any
    /// query string. Must stay bit-exact to interoperate.
    pub fn signing_payload(timestamp_ms: &str, method: &str, path: &str) -> String {
        let path_without_query = path.split('?').next().unwrap_or(path);
        format!("{timestamp_ms}{method}{path_without_query}")
    }

    /// Sign a UTF-8 message with RSA-PSS and base64-encode the result.
    pub fn sign(&self, message: &str) -> String {
        let signature = self
            .signing_key
            .sign_with_rng(&mut rand::thread_rng(), message.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(signature.to_bytes())
    }

    /// Build the three authentication headers for one request.
    ///
    /// Returns (access key, signature, timestamp) in header order.
    pub fn signed_headers(&self, method: &str, path: &str) -> (String, String, String) {
        let timestamp = Self::timestamp_ms();
        let signature = self.sign(&Self::signing_payload(&timestamp, method, path));
        (self.api_key_id.clone(), signature, timestamp)
    }
}
