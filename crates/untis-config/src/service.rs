//! Remote timetabling service configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://neilo.webuntis.com".into()
}

fn default_school() -> String {
    "tgm".into()
}

fn default_client_name() -> String {
    "untis-bridge".into()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Scheme and host of the service, without the JSON-RPC path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// School identifier passed as the `school` query parameter.
    #[serde(default = "default_school")]
    pub school: String,

    /// Client name reported in the `authenticate` call.
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServiceConfig {
    /// Full JSON-RPC endpoint URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/WebUntis/jsonrpc.do?school={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.school)
        )
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            school: default_school(),
            client_name: default_client_name(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
