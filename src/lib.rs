//! Bearer-token access validation for HTTP services.
//!
//! A request reaches the wrapped handler only when its `Authorization` header
//! has the form `<scheme> <token>` and the token verifies as an HMAC-signed JWT
//! under the configured secret. Otherwise the request ends with an empty 400
//! (no usable credential) or 401 (verification failed).

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use error::AccessError;
pub use middleware::auth::{AccessValidator, ValidateAccess, ValidateAccessLayer, validate};
pub use services::auth::{
    DecodedToken, HmacHash, JwtVerifier, Secret, SigningMethod, TokenVerifier, VerifyError,
};
