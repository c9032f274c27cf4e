/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth: access token 検証 (axum middleware / tower layer)
 * - http: request id, trace, body limit, timeout
 */
pub mod auth;
pub mod http;
