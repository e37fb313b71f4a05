//! Shared helpers for the mock-server integration tests.

#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{Value, json};
use untis_config::{CacheConfig, ServiceConfig};
use untis_rpc::{CallContext, Session};

pub const RPC_PATH: &str = "/WebUntis/jsonrpc.do";
pub const SCHOOL: &str = "tgm";
pub const TOKEN: &str = "ABC123";

pub fn service_config(server: &MockServer) -> ServiceConfig {
    ServiceConfig {
        base_url: server.base_url(),
        school: SCHOOL.into(),
        client_name: "untis-test".into(),
        request_timeout_secs: 5,
    }
}

/// Request envelope the client is expected to send.
pub fn rpc(id: u64, method: &str, params: Value) -> Value {
    json!({ "id": id, "method": method, "params": params, "jsonrpc": "2.0" })
}

/// Successful response envelope echoing `id` as a string.
pub fn reply(id: u64, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id.to_string(), "result": result })
}

pub fn session_with_ttl(server: &MockServer, ttl_secs: u64) -> Session {
    Session::from_config(
        &service_config(server),
        &CacheConfig {
            reference_ttl_secs: ttl_secs,
        },
        "jdoe",
        "secret",
    )
    .unwrap()
}

/// Mock for the `authenticate` call with id 1.
pub async fn mock_authenticate(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(RPC_PATH)
                .query_param("school", SCHOOL)
                .json_body(rpc(
                    1,
                    "authenticate",
                    json!({ "user": "jdoe", "password": "secret", "client": "untis-test" }),
                ));
            then.status(200).json_body(reply(
                1,
                json!({ "sessionId": TOKEN, "personType": 2, "personId": 5 }),
            ));
        })
        .await
}

/// Mock for an authenticated call carrying the session cookie.
pub async fn mock_call<'a>(
    server: &'a MockServer,
    id: u64,
    method: &str,
    params: Value,
    result: Value,
) -> Mock<'a> {
    let request = rpc(id, method, params);
    let response = reply(id, result);
    server
        .mock_async(move |when, then| {
            when.method(POST)
                .path(RPC_PATH)
                .header("cookie", format!("JSESSIONID={TOKEN}"))
                .json_body(request);
            then.status(200).json_body(response);
        })
        .await
}

/// Session that has completed `authenticate` (request id 1) against `server`.
pub async fn authenticated_session(server: &MockServer, ttl_secs: u64) -> Session {
    mock_authenticate(server).await;
    let mut session = session_with_ttl(server, ttl_secs);
    session
        .authenticate(&CallContext::background())
        .await
        .unwrap();
    session
}

pub fn teachers() -> Value {
    json!([
        { "id": 7, "name": "SMI", "foreName": "John", "longName": "SMITH Jonathan" },
        { "id": 8, "name": "DOE", "foreName": "Jane", "longName": "DOE Jane" }
    ])
}

pub fn classes() -> Value {
    json!([
        { "id": 1, "name": "5AHIF", "longName": "5AHIF Informatik" },
        { "id": 2, "name": "5BHIF", "longName": "5BHIF Informatik" }
    ])
}

pub fn rooms() -> Value {
    json!([
        { "id": 3, "name": "E12", "longName": "Labor E12" }
    ])
}
