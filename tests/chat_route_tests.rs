//! Chat route behavior when every upstream provider is unreachable: the
//! request surfaces PROVIDER_ERROR and nothing is appended to the history.

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::SystemTime,
};
use tower::ServiceExt;
use url::Url;

fn temp_database_url() -> String {
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    let db_path = std::env::temp_dir().join(format!("prism_chat_routes_{}.sqlite", hasher.finish()));
    format!("sqlite:{}", db_path.to_str().unwrap())
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

fn post_json(uri: &str, token: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).expect("failed to build request")
}

#[tokio::test]
async fn unreachable_providers_yield_502_and_no_history() {
    let db = prism::db::spawn(&temp_database_url()).await;

    let mut cfg = prism::config::Config::default();
    cfg.auth.token_secret = "chat-test-secret".to_string();
    // Nothing listens on the discard port, so every provider call fails fast
    // with a connection error instead of reaching the network.
    cfg.providers.text.endpoint =
        Url::parse("http://127.0.0.1:9/v1/chat/completions").expect("endpoint must parse");
    cfg.providers.image.endpoint =
        Url::parse("http://127.0.0.1:9/v1beta").expect("endpoint must parse");
    cfg.providers.image_fallback.endpoint =
        Url::parse("http://127.0.0.1:9/prompt").expect("endpoint must parse");

    let state = prism::server::router::PrismState::new(&cfg, db);
    let app = prism::server::router::prism_router(state);

    // Register and authenticate.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/auth/register",
            None,
            r#"{"username":"bob","password":"pw"}"#.to_string(),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/auth/token",
            None,
            r#"{"username":"bob","password":"pw"}"#.to_string(),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let token = json_body(resp).await["token"]
        .as_str()
        .expect("token missing")
        .to_string();

    // 1) /chat without a token never reaches a provider.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/chat",
            None,
            r#"{"prompt":"hello there"}"#.to_string(),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 2) Text route: single provider, no fallback, 502.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/chat",
            Some(&token),
            r#"{"prompt":"hello there","session_id":"s1"}"#.to_string(),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "PROVIDER_ERROR");
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message missing")
            .contains("llama-3.3-70b-versatile"),
        "text failures must name the text model"
    );

    // 3) Image route: primary fails, the one fallback attempt fails, and the
    //    surfaced provider is the fallback with both causes in the details.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/chat",
            Some(&token),
            r#"{"prompt":"draw a cat","session_id":"s1"}"#.to_string(),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "PROVIDER_ERROR");
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message missing")
            .contains("pollinations"),
        "image exhaustion must name the fallback"
    );
    let details = body["error"]["details"].as_str().expect("details missing");
    assert!(details.contains("primary failed"), "details: {details}");
    assert!(details.contains("fallback failed"), "details: {details}");

    // 4) Explicit hint forces the image route regardless of prompt content.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/chat",
            Some(&token),
            r#"{"prompt":"hello there","mode":"image"}"#.to_string(),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(resp).await;
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message missing")
            .contains("pollinations"),
        "hinted image route must go through image providers"
    );

    // 5) Failed exchanges are never persisted: the session list stays empty.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/sessions")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, serde_json::json!([]));
}
