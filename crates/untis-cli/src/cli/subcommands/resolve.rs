use clap::{Args, Subcommand};

/// Reference data lookups.
#[derive(Clone, Debug, Subcommand)]
pub enum ResolveCommands {
    /// Teacher id for a "Forename SURNAME" display name.
    TeacherId(ResolveNameArgs),
    /// Class id for a class short name.
    ClassId(ResolveNameArgs),
    /// Teacher short names for ids.
    Teachers(ResolveIdsArgs),
    /// Room names for ids.
    Rooms(ResolveIdsArgs),
    /// Class names for ids.
    Classes(ResolveIdsArgs),
    /// Subject names for ids.
    Subjects(ResolveIdsArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ResolveNameArgs {
    /// Name to look up.
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct ResolveIdsArgs {
    /// Numeric ids to resolve.
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<i64>,
}
