//! access token（HMAC JWT）検証 → OK なら下流の handler へ、NG なら status だけ返す
//!
//! - `Authorization: <scheme> <token>` の 2 要素形式だけを受け付ける (scheme は見ない)
//! - 鍵は HMAC 系の alg にだけ渡す。それ以外は「鍵なし」で検証器に落とさせる
//! - request は書き換えない (extensions にも何も入れない)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AccessError;
use crate::services::auth::{JwtVerifier, Secret, SigningMethod, TokenVerifier, VerifyError};
use crate::state::AppState;

/// Per-request access decision over the `Authorization` header.
///
/// Cheap to clone; the secret and verifier are shared read-only.
pub struct AccessValidator<V = JwtVerifier> {
    secret: Arc<Secret>,
    verifier: Arc<V>,
}

impl AccessValidator<JwtVerifier> {
    pub fn new(secret: Secret) -> Self {
        Self::with_verifier(secret, JwtVerifier::default())
    }
}

impl<V: TokenVerifier> AccessValidator<V> {
    pub fn with_verifier(secret: Secret, verifier: V) -> Self {
        Self {
            secret: Arc::new(secret),
            verifier: Arc::new(verifier),
        }
    }

    /// Decide whether a request carrying `headers` may reach the downstream handler.
    ///
    /// - header missing / empty / not two space-separated parts → 400 bucket
    /// - token part not UTF-8, or verifier error → 401 bucket
    /// - verifier success but token not valid → 400 bucket
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AccessError> {
        let result = self.decide(headers);
        if let Err(err) = &result {
            tracing::debug!(error = %err, status = %err.status(), "access rejected");
        }
        result
    }

    fn decide(&self, headers: &HeaderMap) -> Result<(), AccessError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .filter(|v| !v.is_empty())
            .ok_or(AccessError::MissingCredential)?;

        let token = bearer_token(value.as_bytes()).ok_or(AccessError::MalformedCredential)?;
        let token = std::str::from_utf8(token).map_err(VerifyError::from)?;

        let secret = self.secret.as_ref();
        let decoded = self
            .verifier
            .verify(token, &|method: &SigningMethod| method.resolve_key(secret))?;

        if decoded.valid {
            Ok(())
        } else {
            Err(AccessError::InvalidToken)
        }
    }
}

impl<V> Clone for AccessValidator<V> {
    fn clone(&self) -> Self {
        Self {
            secret: Arc::clone(&self.secret),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

impl<V> std::fmt::Debug for AccessValidator<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AccessValidator").finish_non_exhaustive()
    }
}

/// Second element of a value that splits on single spaces into exactly two parts.
///
/// Works on raw bytes: the scheme is never decoded.
fn bearer_token(value: &[u8]) -> Option<&[u8]> {
    let mut parts = value.split(|b| *b == b' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) => Some(token),
        _ => None,
    }
}

/// 保護したい routes に access 検証の middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// app = app.nest("/api/v1", public.merge(protected));
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AccessError> {
    state.access.authorize(req.headers())?;

    Ok(next.run(req).await)
}
