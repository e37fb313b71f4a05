//! HTTP transport for JSON-RPC envelopes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Serialize;
use untis_config::ServiceConfig;

use crate::context::CallContext;
use crate::error::RpcError;
use crate::wire::RpcRequest;

/// Wait suggested to the caller when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Longest error body kept in [`RpcError::Api`].
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Posts JSON-RPC envelopes to the service endpoint.
///
/// Each transport owns a correlation counter starting at 1, so ids are unique
/// for the lifetime of the session that owns it.
#[derive(Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Build a transport for the endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Network`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(config: &ServiceConfig) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("{}/{}", config.client_name, env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint(),
            next_id: AtomicU64::new(1),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Send one call and return the raw body with the request id it was
    /// sent under.
    ///
    /// The `JSESSIONID` cookie is attached only when `session_id` is given.
    /// The response id is not checked here; see [`crate::wire::decode`].
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Network`] on transport failure, [`RpcError::Api`]
    /// or [`RpcError::RateLimited`] on a non-success status, and
    /// [`RpcError::DeadlineExceeded`] or [`RpcError::Cancelled`] from `ctx`.
    pub async fn send<P: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        method: &str,
        params: &P,
        session_id: Option<&str>,
    ) -> Result<(String, u64), RpcError> {
        let request_id = self.next_request_id();
        let envelope = RpcRequest::new(request_id, method, params);

        let mut request = self.http.post(&self.endpoint).json(&envelope);
        if let Some(token) = session_id {
            request = request.header(reqwest::header::COOKIE, format!("JSESSIONID={token}"));
        }

        tracing::debug!(method, request_id, "sending rpc call");
        let body = ctx
            .run(async {
                let resp = check_status(request.send().await?).await?;
                Ok::<_, RpcError>(resp.text().await?)
            })
            .await?;
        Ok((body, request_id))
    }
}

/// JSON-RPC failures still arrive as HTTP 200. Anything else means the
/// request never reached the RPC layer: a 429 from the front proxy, or a
/// maintenance or login page.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, RpcError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(RpcError::RateLimited {
            retry_after_secs: retry_after_secs(resp.headers()),
        });
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), "non-success status from rpc endpoint");
    Err(RpcError::Api {
        status: status.as_u16(),
        message: summarize_body(&body),
    })
}

/// Delay-seconds form only. HTTP-date values fall back to the default.
fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// One-line description of an error body.
///
/// HTML pages are reduced to their `<title>`. Whitespace is collapsed and the
/// result is cut at [`MAX_ERROR_BODY_CHARS`].
fn summarize_body(body: &str) -> String {
    let text = html_title(body).unwrap_or(body);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push_str("...");
    cut
}

fn html_title(body: &str) -> Option<&str> {
    let lower = body.to_ascii_lowercase();
    let open = lower.find("<title")?;
    let start = open + lower[open..].find('>')? + 1;
    let end = start + lower[start..].find("</title")?;
    Some(&body[start..end])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const MAINTENANCE_PAGE: &str = "<!DOCTYPE html>\n<html><head>\n  <title>\n    WebUntis - Wartungsarbeiten\n  </title>\n</head><body><div class=\"maintenance\">Please try again later.</div></body></html>";

    fn response(status: u16, retry_after: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let transport = HttpTransport::new(&ServiceConfig::default()).unwrap();
        assert_eq!(transport.next_request_id(), 1);
        assert_eq!(transport.next_request_id(), 2);
        assert_eq!(transport.next_request_id(), 3);
    }

    #[test]
    fn endpoint_comes_from_config() {
        let transport = HttpTransport::new(&ServiceConfig::default()).unwrap();
        assert_eq!(
            transport.endpoint(),
            "https://neilo.webuntis.com/WebUntis/jsonrpc.do?school=tgm"
        );
    }

    #[tokio::test]
    async fn ok_passes_rpc_body_through() {
        let resp = response(200, None, r#"{"jsonrpc":"2.0","id":"1","result":{}}"#);
        let resp = check_status(resp).await.unwrap();
        assert_eq!(resp.text().await.unwrap(), r#"{"jsonrpc":"2.0","id":"1","result":{}}"#);
    }

    #[rstest]
    #[case::seconds(Some("30"), 30)]
    #[case::padded(Some(" 5 "), 5)]
    #[case::http_date(Some("Wed, 21 Oct 2026 07:28:00 GMT"), 60)]
    #[case::missing(None, 60)]
    #[tokio::test]
    async fn throttled_requests_report_retry_after(
        #[case] header: Option<&str>,
        #[case] expected: u64,
    ) {
        let err = check_status(response(429, header, "")).await.unwrap_err();
        assert!(
            matches!(err, RpcError::RateLimited { retry_after_secs } if retry_after_secs == expected),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn maintenance_page_is_reduced_to_title() {
        let err = check_status(response(503, None, MAINTENANCE_PAGE)).await.unwrap_err();
        match err {
            RpcError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "WebUntis - Wartungsarbeiten");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn long_plain_bodies_are_truncated() {
        let body = "x".repeat(500);
        let summary = summarize_body(&body);
        assert_eq!(summary.len(), MAX_ERROR_BODY_CHARS + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn html_without_title_keeps_collapsed_markup() {
        assert_eq!(
            summarize_body("<html>\n  <body>gone</body>\n</html>"),
            "<html> <body>gone</body> </html>"
        );
    }
}
