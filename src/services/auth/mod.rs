pub mod jwt;
pub mod secret;
pub mod signing;
pub mod verifier;

pub use jwt::JwtVerifier;
pub use secret::Secret;
pub use signing::{HmacHash, SigningMethod};
pub use verifier::{DecodedToken, TokenVerifier, VerifyError};
