use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use untis_config::UntisConfig;
use untis_core::Lesson;
use untis_rpc::{CallContext, Session};

use crate::cli::root_commands::TimetableArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// A lesson plus its period numbers.
#[derive(Debug, Serialize)]
struct LessonRow {
    #[serde(flatten)]
    lesson: Lesson,
    start_period: i32,
    end_period: i32,
}

impl From<Lesson> for LessonRow {
    fn from(lesson: Lesson) -> Self {
        Self {
            start_period: lesson.start_period(),
            end_period: lesson.end_period(),
            lesson,
        }
    }
}

/// Handle `untis timetable`.
pub async fn handle(
    args: &TimetableArgs,
    session: &mut Session,
    ctx: &CallContext,
    config: &UntisConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let (from, to) = date_range(args, Local::now().date_naive(), config.general.default_range_days);
    if to < from {
        anyhow::bail!("--to ({to}) is before --from ({from})");
    }

    let lessons = match (&args.class, &args.teacher) {
        (Some(class), _) => session.timetable_for_class(ctx, from, to, class).await?,
        (None, Some(teacher)) => session.timetable_for_teacher(ctx, from, to, teacher).await?,
        (None, None) => session.timetable_for_self(ctx, from, to).await?,
    };
    let rows: Vec<LessonRow> = lessons.into_iter().map(LessonRow::from).collect();

    match flags.format {
        OutputFormat::Raw => {
            print!("{}", to_ndjson(&rows)?);
            Ok(())
        }
        OutputFormat::Json => output(&rows, flags.format),
    }
}

fn date_range(args: &TimetableArgs, today: NaiveDate, range_days: u32) -> (NaiveDate, NaiveDate) {
    let from = args.from.unwrap_or(today);
    let to = args.to.unwrap_or_else(|| {
        from.checked_add_days(Days::new(u64::from(range_days)))
            .unwrap_or(NaiveDate::MAX)
    });
    (from, to)
}

fn to_ndjson(rows: &[LessonRow]) -> anyhow::Result<String> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row)?);
        out.push('\n');
    }
    Ok(out)
}
