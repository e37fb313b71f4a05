use serde::Serialize;
use untis_core::{UNMAPPED_PERIOD, period_from_end, period_from_start};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PeriodArgs;
use crate::output::output;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct PeriodResponse {
    time: String,
    boundary: &'static str,
    period: Option<i32>,
}

fn lookup(args: &PeriodArgs) -> PeriodResponse {
    let (boundary, period) = if args.end {
        ("end", period_from_end(&args.time))
    } else {
        ("start", period_from_start(&args.time))
    };
    PeriodResponse {
        time: args.time.format("%H:%M").to_string(),
        boundary,
        period: (period != UNMAPPED_PERIOD).then_some(period),
    }
}

/// Handle `untis period`. Needs no login.
pub fn handle(args: &PeriodArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&lookup(args), flags.format)
}
