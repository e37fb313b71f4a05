//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default timetable window, in days, when no end date is given.
const fn default_range_days() -> u32 {
    7
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Days covered by a timetable query when only a start date is given.
    #[serde(default = "default_range_days")]
    pub default_range_days: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_range_days: default_range_days(),
        }
    }
}
