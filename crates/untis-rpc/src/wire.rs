//! JSON-RPC envelope and per-method result schemas.
//!
//! Every response goes through [`decode`], which checks correlation before
//! looking at the payload and turns any shape mismatch into
//! [`RpcError::MalformedResponse`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use untis_core::{ReferenceEntity, ReferenceKind};

use crate::error::RpcError;

// ── Envelope ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: ?Sized> {
    pub id: u64,
    pub method: &'a str,
    pub params: &'a P,
    pub jsonrpc: &'static str,
}

impl<'a, P: ?Sized> RpcRequest<'a, P> {
    pub const fn new(id: u64, method: &'a str, params: &'a P) -> Self {
        Self {
            id,
            method,
            params,
            jsonrpc: "2.0",
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Render a response id as the decimal string it is compared against.
fn normalize_id(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode a raw response body for the request with id `request_id`.
///
/// Order of checks: envelope parses, `id` echoes the request id, no `error`
/// object, `result` present and of the expected shape.
///
/// # Errors
///
/// [`RpcError::MalformedResponse`], [`RpcError::IdentifierMismatch`] or
/// [`RpcError::Remote`].
pub fn decode<T: DeserializeOwned>(body: &str, request_id: u64) -> Result<T, RpcError> {
    let envelope: RpcResponse = serde_json::from_str(body)
        .map_err(|e| RpcError::MalformedResponse(format!("invalid envelope: {e}")))?;

    let actual = envelope.id.as_ref().and_then(normalize_id);
    if actual.as_deref() != Some(request_id.to_string().as_str()) {
        return Err(RpcError::IdentifierMismatch {
            expected: request_id,
            actual,
        });
    }

    if let Some(error) = envelope.error {
        return Err(RpcError::Remote {
            code: error.code,
            message: error.message,
        });
    }

    let result = envelope
        .result
        .ok_or_else(|| RpcError::MalformedResponse("missing result".into()))?;
    serde_json::from_value(result)
        .map_err(|e| RpcError::MalformedResponse(format!("unexpected result shape: {e}")))
}

// ── authenticate ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AuthenticateParams<'a> {
    pub user: &'a str,
    pub password: &'a str,
    pub client: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResult {
    pub session_id: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub person_type: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub person_id: i64,
}

/// Integer coercion for identity fields: numbers are truncated, numeric
/// strings parsed, anything else becomes `0`.
fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    #[allow(clippy::cast_possible_truncation)]
    let coerced = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    Ok(coerced)
}

// ── getTimetable ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableParams {
    pub id: i64,
    #[serde(rename = "type")]
    pub element_type: i64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRecord {
    #[serde(default)]
    pub id: i64,
    pub date: i64,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(default)]
    pub kl: Vec<ElementRef>,
    #[serde(default)]
    pub te: Vec<ElementRef>,
    #[serde(default)]
    pub su: Vec<ElementRef>,
    #[serde(default)]
    pub ro: Vec<ElementRef>,
}

#[derive(Debug, Deserialize)]
pub struct ElementRef {
    pub id: i64,
}

pub fn element_ids(refs: &[ElementRef]) -> Vec<i64> {
    refs.iter().map(|r| r.id).collect()
}

// ── getTeachers / getRooms / getKlassen / getSubjects ──────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub fore_name: Option<String>,
    #[serde(default)]
    pub fore_color: Option<String>,
    #[serde(default)]
    pub back_color: Option<String>,
}

impl ReferenceRecord {
    pub fn into_entity(self, kind: ReferenceKind) -> ReferenceEntity {
        ReferenceEntity {
            kind,
            id: self.id,
            name: self.name,
            long_name: self.long_name,
            fore_name: self.fore_name,
            fore_color: self.fore_color,
            back_color: self.back_color,
        }
    }
}

/// Params for the no-argument methods (`logout` and the listings).
#[derive(Debug, Serialize)]
pub struct EmptyParams {}
