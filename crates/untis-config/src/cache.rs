//! Reference-data cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_reference_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// How long a teacher/room/class listing is reused before it is fetched
    /// again. `0` fetches the listing on every resolution call.
    #[serde(default = "default_reference_ttl_secs")]
    pub reference_ttl_secs: u64,
}

impl CacheConfig {
    /// The configured TTL, or `None` when caching is disabled.
    #[must_use]
    pub const fn reference_ttl(&self) -> Option<Duration> {
        if self.reference_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.reference_ttl_secs))
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            reference_ttl_secs: default_reference_ttl_secs(),
        }
    }
}
