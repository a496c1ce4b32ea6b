//! Bearer gate behaviour through the fully layered router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use places_gate::BearerSecret;

mod common;
use common::{app, body_bytes, body_json, post_json, rpc_response, tools_call, SECRET};

fn stub_call() -> serde_json::Value {
    tools_call("stub", json!({}))
}

#[tokio::test]
async fn missing_header_is_rejected_before_the_tool() {
    let (router, stub) = app(BearerSecret::new(SECRET));

    let response = router
        .oneshot(post_json("/mcp", None, &stub_call()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(&body_bytes(response).await[..], b"Missing Authorization Header");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let (router, stub) = app(BearerSecret::new(SECRET));

    let response = router
        .oneshot(post_json("/mcp", Some("Bearer wrongtoken"), &stub_call()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(&body_bytes(response).await[..], b"Unauthorized");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn correct_token_reaches_the_tool_once() {
    let (router, stub) = app(BearerSecret::new(SECRET));

    let response = router
        .oneshot(post_json("/mcp", Some("Bearer abc123"), &stub_call()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = rpc_response(response).await;
    assert_eq!(body["result"]["content"][0]["text"], "stub answer");
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn wrong_scheme_is_unauthorized() {
    let (router, stub) = app(BearerSecret::new(SECRET));

    let response = router
        .oneshot(post_json("/mcp", Some("Basic abc123"), &stub_call()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(&body_bytes(response).await[..], b"Unauthorized");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn irregular_spacing_is_forwarded() {
    let (router, stub) = app(BearerSecret::new(SECRET));

    let response = router
        .oneshot(post_json("/mcp", Some("  Bearer    abc123"), &stub_call()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let _ = body_bytes(response).await;
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn allowed_response_matches_handler_output() {
    let (router, _stub) = app(BearerSecret::new(SECRET));
    let message = json!({"jsonrpc": "2.0", "id": 9, "method": "tools/list"});

    let first = router
        .clone()
        .oneshot(post_json("/mcp", Some("Bearer abc123"), &message))
        .await
        .unwrap();
    let second = router
        .oneshot(post_json("/mcp", Some("Bearer abc123"), &message))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.status(), second.status());
    assert_eq!(
        first.headers()[header::CONTENT_TYPE],
        second.headers()[header::CONTENT_TYPE]
    );
    let first = rpc_response(first).await;
    assert_eq!(first["result"]["tools"][0]["name"], "stub");
    assert_eq!(first, rpc_response(second).await);
}

#[tokio::test]
async fn unset_secret_rejects_every_credential() {
    let (router, stub) = app(BearerSecret::unset());

    for value in ["Bearer abc123", "Bearer ", "Bearer x"] {
        let response = router
            .clone()
            .oneshot(post_json("/mcp", Some(value), &stub_call()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "value {:?}", value);
    }
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn health_stays_reachable_when_misconfigured() {
    let (router, _stub) = app(BearerSecret::unset());

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn unknown_paths_are_gated_too() {
    let (router, _stub) = app(BearerSecret::new(SECRET));

    let response = router
        .oneshot(Request::builder().uri("/admin").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn repeated_request_gets_same_decision() {
    let (router, _stub) = app(BearerSecret::new(SECRET));

    for _ in 0..3 {
        let response = router
            .clone()
            .oneshot(post_json("/mcp", Some("Bearer wrongtoken"), &stub_call()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

fn with_upgrade_headers(
    mut request: Request<Body>,
    protocol: &'static str,
) -> Request<Body> {
    let headers = request.headers_mut();
    headers.insert(header::CONNECTION, "Upgrade".parse().unwrap());
    headers.insert(header::UPGRADE, protocol.parse().unwrap());
    request
}

#[tokio::test]
async fn upgrade_headers_do_not_skip_the_gate() {
    let (router, stub) = app(BearerSecret::new(SECRET));
    let list = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"});

    for protocol in ["h2c", "websocket"] {
        let request = with_upgrade_headers(post_json("/mcp", None, &list), protocol);
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "upgrade {}", protocol);
        assert_eq!(&body_bytes(response).await[..], b"Missing Authorization Header");

        let request = with_upgrade_headers(
            post_json("/mcp", Some("Bearer wrongtoken"), &stub_call()),
            protocol,
        );
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "upgrade {}", protocol);
        assert_eq!(&body_bytes(response).await[..], b"Unauthorized");
    }

    let handshake = Request::builder()
        .method("GET")
        .uri("/mcp")
        .header("connection", "Upgrade")
        .header("upgrade", "websocket")
        .header("sec-websocket-version", "13")
        .header("sec-websocket-key", "dGhlIHNhbXBsZSBub25jZQ==")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(handshake).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn repeated_authorization_uses_last_value() {
    let (router, stub) = app(BearerSecret::new(SECRET));

    let mut request = post_json("/mcp", Some("Bearer wrong"), &stub_call());
    request
        .headers_mut()
        .append(header::AUTHORIZATION, "Bearer abc123".parse().unwrap());
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let _ = body_bytes(response).await;
    assert_eq!(stub.calls(), 1);

    let mut request = post_json("/mcp", Some("Bearer abc123"), &stub_call());
    request
        .headers_mut()
        .append(header::AUTHORIZATION, "Bearer wrong".parse().unwrap());
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(&body_bytes(response).await[..], b"Unauthorized");
    assert_eq!(stub.calls(), 1);
}
