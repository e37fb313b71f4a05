use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand};

use crate::cli::subcommands::ResolveCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Show the logged-in person.
    Whoami,
    /// List lessons for yourself, a class, or a teacher.
    Timetable(TimetableArgs),
    /// Translate between reference ids and names.
    Resolve {
        #[command(subcommand)]
        action: ResolveCommands,
    },
    /// Look up the period number for a wall-clock time (offline).
    Period(PeriodArgs),
}

impl Commands {
    /// Whether the command talks to the service and needs a login first.
    #[must_use]
    pub const fn needs_session(&self) -> bool {
        !matches!(self, Self::Period(_))
    }
}

#[derive(Clone, Debug, Args)]
pub struct TimetableArgs {
    /// Class short name (e.g. 5AHIF).
    #[arg(long, conflicts_with = "teacher")]
    pub class: Option<String>,
    /// Teacher display name ("Forename SURNAME").
    #[arg(long)]
    pub teacher: Option<String>,
    /// First day (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day (YYYY-MM-DD). Defaults to `from` plus the configured range.
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Clone, Debug, Args)]
pub struct PeriodArgs {
    /// Time as HH:MM.
    #[arg(value_parser = parse_clock)]
    pub time: NaiveTime,
    /// Treat the time as a lesson end instead of a start.
    #[arg(long)]
    pub end: bool,
}

fn parse_clock(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|error| format!("expected HH:MM, got '{value}': {error}"))
}
