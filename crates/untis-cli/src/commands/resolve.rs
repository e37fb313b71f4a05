use serde::Serialize;
use untis_core::ReferenceKind;
use untis_rpc::{CallContext, ResolvedNames, Session};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ResolveCommands;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ResolvedIdResponse<'a> {
    kind: ReferenceKind,
    name: &'a str,
    id: i64,
}

#[derive(Debug, Serialize)]
struct ResolvedNamesResponse<'a> {
    kind: ReferenceKind,
    ids: &'a [i64],
    #[serde(flatten)]
    resolved: ResolvedNames,
}

/// Handle `untis resolve <subcommand>`.
pub async fn handle(
    action: &ResolveCommands,
    session: &mut Session,
    ctx: &CallContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let (kind, args) = match action {
        ResolveCommands::TeacherId(args) => {
            let id = session.resolve_teacher_id(ctx, &args.name).await?;
            return output(
                &ResolvedIdResponse {
                    kind: ReferenceKind::Teacher,
                    name: &args.name,
                    id,
                },
                flags.format,
            );
        }
        ResolveCommands::ClassId(args) => {
            let id = session.resolve_class_id(ctx, &args.name).await?;
            return output(
                &ResolvedIdResponse {
                    kind: ReferenceKind::Class,
                    name: &args.name,
                    id,
                },
                flags.format,
            );
        }
        ResolveCommands::Teachers(args) => (ReferenceKind::Teacher, args),
        ResolveCommands::Rooms(args) => (ReferenceKind::Room, args),
        ResolveCommands::Classes(args) => (ReferenceKind::Class, args),
        ResolveCommands::Subjects(args) => (ReferenceKind::Subject, args),
    };

    let resolved = session.resolve_names(ctx, kind, &args.ids).await?;
    output(
        &ResolvedNamesResponse {
            kind,
            ids: &args.ids,
            resolved,
        },
        flags.format,
    )
}
