use jsonwebtoken::{DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::services::auth::signing::SigningMethod;
use crate::services::auth::verifier::{DecodedToken, TokenVerifier, VerifyError};

/// HMAC access-token verifier backed by `jsonwebtoken`.
///
/// - Signature is checked with the algorithm named in the token header, and only
///   with the key the resolver hands back for it.
/// - `exp` / `nbf` / `iat` are checked when present; no registered claim is
///   required. `jsonwebtoken` has no `iat` check, so a numeric `iat` later than
///   now plus leeway is rejected here.
/// - `aud` is not checked.
#[derive(Debug, Clone, Default)]
pub struct JwtVerifier {
    leeway_seconds: u64,
}

impl JwtVerifier {
    pub fn new(leeway_seconds: u64) -> Self {
        Self { leeway_seconds }
    }

    pub fn leeway_seconds(&self) -> u64 {
        self.leeway_seconds
    }

    fn validation(&self, method: SigningMethod) -> Validation {
        let mut validation = Validation::new(method.algorithm());
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = self.leeway_seconds;
        validation
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify<'k>(
        &self,
        token: &str,
        resolve_key: &dyn Fn(&SigningMethod) -> Option<&'k [u8]>,
    ) -> Result<DecodedToken, VerifyError> {
        let header = jsonwebtoken::decode_header(token)?;
        let method = SigningMethod::from(header.alg);

        let key = resolve_key(&method).ok_or(VerifyError::KeyUnavailable(method))?;

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &DecodingKey::from_secret(key),
            &self.validation(method),
        )?;

        if let Some(iat) = data.claims.get("iat").and_then(Value::as_f64) {
            let now = jsonwebtoken::get_current_timestamp() as f64;
            if iat > now + self.leeway_seconds as f64 {
                return Err(VerifyError::IssuedInFuture);
            }
        }

        Ok(DecodedToken {
            method,
            header: data.header,
            claims: data.claims,
            valid: true,
        })
    }
}
