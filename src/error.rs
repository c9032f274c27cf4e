/*
 * Responsibility
 * - access 検証で発生するエラーの定義 (AccessError)
 * - IntoResponse 実装 (HTTP status のみ。body は返さない)
 *
 * Notes
 * - 400: credential が無い/読めない/形式不正、または検証器が invalid と判定したもの
 * - 401: 検証器がエラーを返したもの (署名不一致、期限切れ、HMAC 以外の alg など)
 * - 理由はクライアントに返さない (ログにだけ残す)
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::auth::VerifyError;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("missing credential")]
    MissingCredential,
    #[error("malformed credential")]
    MalformedCredential,
    #[error(transparent)]
    Verification(#[from] VerifyError),
    #[error("token reported invalid")]
    InvalidToken,
}

impl AccessError {
    pub fn status(&self) -> StatusCode {
        match self {
            AccessError::MissingCredential
            | AccessError::MalformedCredential
            | AccessError::InvalidToken => StatusCode::BAD_REQUEST,
            AccessError::Verification(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}
