//! Router-level tests for the access validator.
//!
//! Tokens are minted with `jsonwebtoken` under a fixed test secret; requests go
//! through `tower::ServiceExt::oneshot` without binding a socket.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use access_guard::app::{build_router, build_state};
use access_guard::config::Config;
use access_guard::middleware::auth::access;
use access_guard::state::AppState;
use access_guard::{AccessValidator, Secret};
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use axum::routing::get;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-4f9a";

fn hs_token(alg: Algorithm, claims: Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::new(alg),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn valid_token() -> String {
    hs_token(Algorithm::HS256, json!({ "sub": "alice" }), SECRET)
}

/// Well-formed JWT whose header claims RS256. The signature bytes are arbitrary.
fn rs256_token() -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"alice"}"#);
    let signature = URL_SAFE_NO_PAD.encode([7u8; 256]);
    format!("{header}.{payload}.{signature}")
}

/// Router with one guarded route whose handler counts invocations and answers 202.
fn counting_app(calls: Arc<AtomicUsize>) -> Router {
    let state = AppState::new(AccessValidator::new(Secret::from(SECRET)));

    let guarded = Router::new().route(
        "/guarded",
        get(move || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                (StatusCode::ACCEPTED, "downstream body")
            }
        }),
    );

    access::apply(guarded, state.clone()).with_state(state)
}

fn request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/guarded");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

#[tokio::test]
async fn missing_header_is_bad_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_app(calls.clone());

    let response = app.oneshot(request(None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn single_token_header_is_bad_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_app(calls.clone());

    let response = app.oneshot(request(Some(&valid_token()))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn three_part_header_is_bad_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let token = valid_token();

    for value in [
        format!("Bearer {token} extra"),
        format!("Bearer  {token}"),
        format!("Bearer a b c {token}"),
    ] {
        let response = counting_app(calls.clone())
            .oneshot(request(Some(&value)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{value}");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_token_runs_downstream_once_and_keeps_its_response() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_app(calls.clone());

    let response = app
        .oneshot(request(Some(&format!("Bearer {}", valid_token()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(&body_bytes(response).await[..], b"downstream body");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn hs384_and_hs512_are_accepted() {
    let calls = Arc::new(AtomicUsize::new(0));

    for alg in [Algorithm::HS384, Algorithm::HS512] {
        let token = hs_token(alg, json!({ "sub": "alice" }), SECRET);
        let response = counting_app(calls.clone())
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED, "{alg:?}");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn non_hmac_token_is_unauthorized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_app(calls.clone());

    let response = app
        .oneshot(request(Some(&format!("Bearer {}", rs256_token()))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_secret_is_unauthorized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_app(calls.clone());
    let token = hs_token(Algorithm::HS256, json!({ "sub": "alice" }), "another-secret");

    let response = app
        .oneshot(request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn expired_token_is_unauthorized_and_exp_is_optional() {
    let calls = Arc::new(AtomicUsize::new(0));
    let now = chrono::Utc::now().timestamp();

    let expired = hs_token(Algorithm::HS256, json!({ "exp": now - 3600 }), SECRET);
    let response = counting_app(calls.clone())
        .oneshot(request(Some(&format!("Bearer {expired}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let no_exp = hs_token(Algorithm::HS256, json!({}), SECRET);
    let response = counting_app(calls.clone())
        .oneshot(request(Some(&format!("Bearer {no_exp}"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn token_issued_in_future_is_unauthorized() {
    let calls = Arc::new(AtomicUsize::new(0));
    let iat = chrono::Utc::now().timestamp() + 86_400;
    let token = hs_token(Algorithm::HS256, json!({ "iat": iat }), SECRET);

    let response = counting_app(calls.clone())
        .oneshot(request(Some(&format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = counting_app(Arc::new(AtomicUsize::new(0)));

    let response = app
        .oneshot(request(Some("Bearer not.a.jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn header_name_is_case_insensitive() {
    let app = counting_app(Arc::new(AtomicUsize::new(0)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/guarded")
                .header("AUTHORIZATION", format!("Bearer {}", valid_token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn repeated_requests_get_identical_outcomes() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_app(calls.clone());
    let good = format!("Bearer {}", valid_token());

    for _ in 0..2 {
        let ok = app.clone().oneshot(request(Some(&good))).await.unwrap();
        assert_eq!(ok.status(), StatusCode::ACCEPTED);

        let bad = app.clone().oneshot(request(Some("garbage"))).await.unwrap();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_requests_with_distinct_tokens_all_succeed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_app(calls.clone());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let app = app.clone();
            let token = hs_token(Algorithm::HS256, json!({ "sub": format!("user-{i}") }), SECRET);
            tokio::spawn(async move {
                app.oneshot(request(Some(&format!("Bearer {token}"))))
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::ACCEPTED);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 16);
}

#[tokio::test]
async fn secret_never_appears_in_responses() {
    let forged = hs_token(Algorithm::HS256, json!({ "sub": SECRET }), "wrong");
    let inputs: Vec<Option<String>> = vec![
        None,
        Some(String::new()),
        Some(SECRET.to_string()),
        Some(format!("Bearer {SECRET}")),
        Some(format!("Bearer {forged}")),
        Some(format!("Bearer {}", rs256_token())),
        Some(format!("{SECRET} {SECRET} {SECRET}")),
    ];

    for input in inputs {
        let app = counting_app(Arc::new(AtomicUsize::new(0)));
        let response = app.oneshot(request(input.as_deref())).await.unwrap();

        assert!(response.status().is_client_error(), "{input:?}");
        for value in response.headers().values() {
            assert!(!value.as_bytes().windows(SECRET.len()).any(|w| w == SECRET.as_bytes()));
        }
        let body = body_bytes(response).await;
        assert!(body.is_empty(), "{input:?}");
    }
}

fn test_config() -> Config {
    Config::from_vars(|key| match key {
        "ACCESS_JWT_SECRET" => Some(SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn application_router_guards_protected_route_only() {
    let config = test_config();
    let app = build_router(build_state(&config), &config);

    let health = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let anonymous = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/protected")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::BAD_REQUEST);
    assert!(anonymous.headers().contains_key("x-request-id"));

    let authorized = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/protected")
                .header(header::AUTHORIZATION, format!("Bearer {}", valid_token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(authorized.status(), StatusCode::OK);

    let body: Value = serde_json::from_slice(&body_bytes(authorized).await).unwrap();
    assert_eq!(body["status"], "authorized");
}
