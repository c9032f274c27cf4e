/*
 * Responsibility
 * - access token 検証器の契約 (TokenVerifier)
 * - 検証結果 (DecodedToken) とエラー (VerifyError)
 *
 * Notes
 * - 鍵の選択は呼び出し側 (middleware) が key resolver として渡す
 * - middleware は DecodedToken.valid しか見ない。claims は下流の都合で公開しているだけ
 */
use jsonwebtoken::Header;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::services::auth::signing::SigningMethod;

/// Errors returned by a [`TokenVerifier`].
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("no verification key for {0} tokens")]
    KeyUnavailable(SigningMethod),
    #[error("token is not valid utf-8")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("token used before issued")]
    IssuedInFuture,
}

/// A token that passed through a verifier.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    pub method: SigningMethod,
    pub header: Header,
    pub claims: Map<String, Value>,
    pub valid: bool,
}

/// Verifies a bearer token against a key chosen by the caller.
///
/// `resolve_key` receives the signing method claimed by the (not yet verified)
/// token and returns the key to check it with, or `None` to refuse the method.
/// Implementations must report a refused method as an error.
pub trait TokenVerifier: Send + Sync + 'static {
    fn verify<'k>(
        &self,
        token: &str,
        resolve_key: &dyn Fn(&SigningMethod) -> Option<&'k [u8]>,
    ) -> Result<DecodedToken, VerifyError>;
}
