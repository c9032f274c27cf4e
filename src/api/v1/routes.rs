/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、/protected 以下は access 検証を通す
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, protected::protected};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let guarded = access::apply(
        Router::new().route("/protected", get(protected)),
        state,
    );

    public.merge(guarded)
}
