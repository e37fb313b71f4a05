//! Authentication and logout against a mock JSON-RPC server.

mod common;

use std::time::Duration;

use common::*;
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use untis_core::{PersonType, SessionState};
use untis_rpc::{CallContext, CancelToken, RpcError};

#[tokio::test]
async fn authenticate_records_identity() {
    let server = MockServer::start_async().await;
    let auth = mock_authenticate(&server).await;

    let mut session = session_with_ttl(&server, 300);
    session.authenticate(&CallContext::background()).await.unwrap();

    auth.assert_async().await;
    assert!(session.is_authenticated());
    assert!(!session.is_closed());
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.session_id(), Some("ABC123"));
    assert_eq!(session.person_type(), PersonType::Teacher);
    assert_eq!(session.person_id(), 5);
}

#[tokio::test]
async fn authenticate_twice_is_rejected_without_network() {
    let server = MockServer::start_async().await;
    let auth = mock_authenticate(&server).await;

    let mut session = session_with_ttl(&server, 300);
    let ctx = CallContext::background();
    session.authenticate(&ctx).await.unwrap();

    let err = session.authenticate(&ctx).await.unwrap_err();
    assert!(matches!(err, RpcError::AlreadyAuthenticated));
    assert_eq!(session.session_id(), Some("ABC123"));
    auth.assert_calls_async(1).await;
}

#[tokio::test]
async fn mismatched_id_leaves_session_unauthenticated() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(RPC_PATH);
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": "999",
                "result": { "sessionId": "ABC123", "personType": 2, "personId": 5 }
            }));
        })
        .await;

    let mut session = session_with_ttl(&server, 300);
    let err = session.authenticate(&CallContext::background()).await.unwrap_err();

    assert!(matches!(
        err,
        RpcError::IdentifierMismatch { expected: 1, .. }
    ));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(session.session_id(), None);
    assert_eq!(session.person_id(), -1);
}

#[tokio::test]
async fn missing_identity_fields_default_to_zero() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(RPC_PATH);
            then.status(200)
                .json_body(reply(1, json!({ "sessionId": "XYZ" })));
        })
        .await;

    let mut session = session_with_ttl(&server, 300);
    session.authenticate(&CallContext::background()).await.unwrap();

    assert_eq!(session.session_id(), Some("XYZ"));
    assert_eq!(session.person_type(), PersonType::Unknown);
    assert_eq!(session.person_id(), 0);
}

#[tokio::test]
async fn remote_error_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(RPC_PATH);
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": "1",
                "error": { "code": -8504, "message": "bad credentials" }
            }));
        })
        .await;

    let mut session = session_with_ttl(&server, 300);
    let err = session.authenticate(&CallContext::background()).await.unwrap_err();

    assert!(matches!(err, RpcError::Remote { code: -8504, .. }));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn result_without_session_id_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(RPC_PATH);
            then.status(200)
                .json_body(reply(1, json!({ "personType": 2, "personId": 5 })));
        })
        .await;

    let mut session = session_with_ttl(&server, 300);
    let err = session.authenticate(&CallContext::background()).await.unwrap_err();

    assert!(matches!(err, RpcError::MalformedResponse(_)));
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[tokio::test]
async fn blank_session_id_is_malformed(#[case] session_id: &str) {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(RPC_PATH);
            then.status(200).json_body(reply(
                1,
                json!({ "sessionId": session_id, "personType": 2, "personId": 5 }),
            ));
        })
        .await;

    let mut session = session_with_ttl(&server, 300);
    let err = session.authenticate(&CallContext::background()).await.unwrap_err();

    assert!(matches!(err, RpcError::MalformedResponse(_)));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(session.session_id(), None);
    assert_eq!(session.person_id(), -1);
}

#[tokio::test]
async fn http_failure_status_is_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(RPC_PATH);
            then.status(503).body("maintenance");
        })
        .await;

    let mut session = session_with_ttl(&server, 300);
    let err = session.authenticate(&CallContext::background()).await.unwrap_err();

    assert!(matches!(err, RpcError::Api { status: 503, .. }));
}

#[tokio::test]
async fn close_sends_logout_with_cookie() {
    let server = MockServer::start_async().await;
    let mut session = authenticated_session(&server, 300).await;
    let logout = mock_call(&server, 2, "logout", json!({}), json!(null)).await;

    session.close(&CallContext::background()).await.unwrap();

    logout.assert_async().await;
    assert!(session.is_closed());
    assert!(!session.is_authenticated());
    assert_eq!(session.session_id(), None);
}

#[tokio::test]
async fn close_failure_still_closes() {
    let server = MockServer::start_async().await;
    let mut session = authenticated_session(&server, 300).await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(RPC_PATH)
                .body_includes(r#""method":"logout""#);
            then.status(500);
        })
        .await;

    let err = session.close(&CallContext::background()).await.unwrap_err();

    assert!(matches!(err, RpcError::Api { status: 500, .. }));
    assert!(session.is_closed());
    assert_eq!(session.session_id(), None);
}

#[tokio::test]
async fn closed_session_rejects_everything() {
    let server = MockServer::start_async().await;
    let mut session = authenticated_session(&server, 300).await;
    mock_call(&server, 2, "logout", json!({}), json!(null)).await;
    let ctx = CallContext::background();
    session.close(&ctx).await.unwrap();

    assert!(matches!(
        session.close(&ctx).await.unwrap_err(),
        RpcError::NotAuthenticated
    ));
    assert!(matches!(
        session.authenticate(&ctx).await.unwrap_err(),
        RpcError::AlreadyAuthenticated
    ));
    assert!(matches!(
        session.resolve_room_names(&ctx, &[3]).await.unwrap_err(),
        RpcError::NotAuthenticated
    ));
}

#[tokio::test]
async fn unauthenticated_operations_make_no_calls() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(reply(1, json!([])));
        })
        .await;

    let mut session = session_with_ttl(&server, 300);
    let ctx = CallContext::background();
    let start = chrono::NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

    assert!(matches!(
        session.timetable_for_self(&ctx, start, start).await.unwrap_err(),
        RpcError::NotAuthenticated
    ));
    assert!(matches!(
        session
            .timetable_for_class(&ctx, start, start, "5AHIF")
            .await
            .unwrap_err(),
        RpcError::NotAuthenticated
    ));
    assert!(matches!(
        session.resolve_teacher_id(&ctx, "John SMITH").await.unwrap_err(),
        RpcError::NotAuthenticated
    ));
    assert!(matches!(
        session.resolve_teacher_names(&ctx, &[]).await.unwrap_err(),
        RpcError::NotAuthenticated
    ));
    assert!(matches!(
        session.close(&ctx).await.unwrap_err(),
        RpcError::NotAuthenticated
    ));

    any.assert_calls_async(0).await;
}

#[tokio::test]
async fn cancelled_context_leaves_state_untouched() {
    let server = MockServer::start_async().await;
    let auth = mock_authenticate(&server).await;

    let token = CancelToken::new();
    token.cancel();
    let ctx = CallContext::background().with_cancel(token);

    let mut session = session_with_ttl(&server, 300);
    let err = session.authenticate(&ctx).await.unwrap_err();

    assert!(matches!(err, RpcError::Cancelled));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    auth.assert_calls_async(0).await;
}

#[rstest]
#[case::cancelled(true)]
#[case::expired(false)]
#[tokio::test]
async fn close_with_spent_context_stays_authenticated(#[case] cancel: bool) {
    let server = MockServer::start_async().await;
    let mut session = authenticated_session(&server, 300).await;
    let logout = mock_call(&server, 2, "logout", json!({}), json!(null)).await;

    let ctx = if cancel {
        let token = CancelToken::new();
        token.cancel();
        CallContext::background().with_cancel(token)
    } else {
        CallContext::background().with_deadline(tokio::time::Instant::now())
    };
    let err = session.close(&ctx).await.unwrap_err();

    assert!(matches!(
        err,
        RpcError::Cancelled | RpcError::DeadlineExceeded
    ));
    assert!(session.is_authenticated());
    assert_eq!(session.session_id(), Some(TOKEN));
    logout.assert_calls_async(0).await;

    session.close(&CallContext::background()).await.unwrap();
    logout.assert_async().await;
    assert!(session.is_closed());
}

#[tokio::test]
async fn slow_server_hits_deadline() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(RPC_PATH);
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(reply(1, json!({ "sessionId": "ABC123" })));
        })
        .await;

    let mut session = session_with_ttl(&server, 300);
    let ctx = CallContext::background().with_timeout(Duration::from_millis(50));
    let err = session.authenticate(&ctx).await.unwrap_err();

    assert!(matches!(err, RpcError::DeadlineExceeded));
    assert_eq!(session.state(), SessionState::Unauthenticated);
}
