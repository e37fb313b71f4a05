use untis_config::UntisConfig;
use untis_rpc::{CallContext, SharedSession};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a session-backed command to its handler.
pub async fn dispatch(
    command: &Commands,
    handle: &SharedSession,
    ctx: &CallContext,
    config: &UntisConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut session = handle.lock().await;
    match command {
        Commands::Whoami => commands::whoami::handle(&session, flags),
        Commands::Timetable(args) => {
            commands::timetable::handle(args, &mut session, ctx, config, flags).await
        }
        Commands::Resolve { action } => {
            commands::resolve::handle(action, &mut session, ctx, flags).await
        }
        Commands::Period(_) => dispatch_offline(command, flags),
    }
}

/// Dispatch a command that runs without logging in.
pub fn dispatch_offline(command: &Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Period(args) => commands::period::handle(args, flags),
        Commands::Whoami | Commands::Timetable(_) | Commands::Resolve { .. } => {
            anyhow::bail!("this command needs a login")
        }
    }
}
