/*
 * Responsibility
 * - HMAC 共有鍵 (access token の検証鍵) を保持する型
 * - Debug / tracing に鍵が出ないよう secrecy でラップする
 */
use secrecy::{ExposeSecret, SecretString};

/// Symmetric key material used to verify HMAC-signed access tokens.
///
/// - Debug output is redacted by `secrecy`.
/// - Empty secrets are accepted here; whether they verify anything is up to the verifier.
#[derive(Clone, Debug)]
pub struct Secret(SecretString);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Raw key bytes. Only the key resolver should call this.
    pub fn expose_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
