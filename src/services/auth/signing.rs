use std::fmt;

use jsonwebtoken::Algorithm;

use crate::services::auth::secret::Secret;

/// Hash function behind an HMAC signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HmacHash {
    Sha256,
    Sha384,
    Sha512,
}

/// Signing method claimed by a token's `alg` header, grouped by key family.
///
/// Only `Hmac` resolves to a key; every other family is rejected by handing
/// the verifier no key at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningMethod {
    Hmac(HmacHash),
    Rsa(Algorithm),
    RsaPss(Algorithm),
    Ecdsa(Algorithm),
    EdDsa,
}

impl SigningMethod {
    pub fn is_hmac(&self) -> bool {
        matches!(self, Self::Hmac(_))
    }

    pub fn algorithm(&self) -> Algorithm {
        match *self {
            Self::Hmac(HmacHash::Sha256) => Algorithm::HS256,
            Self::Hmac(HmacHash::Sha384) => Algorithm::HS384,
            Self::Hmac(HmacHash::Sha512) => Algorithm::HS512,
            Self::Rsa(alg) | Self::RsaPss(alg) | Self::Ecdsa(alg) => alg,
            Self::EdDsa => Algorithm::EdDSA,
        }
    }

    /// Key for verifying a token signed with this method.
    ///
    /// `None` is not an error: the verifier treats a missing key as a failed verification.
    pub fn resolve_key<'k>(&self, secret: &'k Secret) -> Option<&'k [u8]> {
        match self {
            Self::Hmac(_) => Some(secret.expose_bytes()),
            Self::Rsa(_) | Self::RsaPss(_) | Self::Ecdsa(_) | Self::EdDsa => None,
        }
    }
}

impl From<Algorithm> for SigningMethod {
    fn from(alg: Algorithm) -> Self {
        match alg {
            Algorithm::HS256 => Self::Hmac(HmacHash::Sha256),
            Algorithm::HS384 => Self::Hmac(HmacHash::Sha384),
            Algorithm::HS512 => Self::Hmac(HmacHash::Sha512),
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => Self::Rsa(alg),
            Algorithm::PS256 | Algorithm::PS384 | Algorithm::PS512 => Self::RsaPss(alg),
            Algorithm::ES256 | Algorithm::ES384 => Self::Ecdsa(alg),
            Algorithm::EdDSA => Self::EdDsa,
        }
    }
}

impl fmt::Display for SigningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.algorithm())
    }
}
