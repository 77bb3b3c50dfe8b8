use crate::calc::ScheduleSession;
use crate::calc::dates::format_label;
use crate::cmd::{Context, write_exam_header, write_exam_row, write_rejected_note};
use anyhow::Result;
use chrono::NaiveDate;

pub fn run(ctx: &Context, from: Option<NaiveDate>, limit: Option<usize>) -> Result<()> {
    let session = ctx.session()?;
    let from = from.unwrap_or_else(super::today);
    let limit = limit.unwrap_or(ctx.settings.upcoming_limit);
    write_upcoming(&session, from, limit, &mut std::io::stdout())
}

pub(crate) fn write_upcoming<W: std::io::Write>(
    session: &ScheduleSession,
    from: NaiveDate,
    limit: usize,
    out: &mut W,
) -> Result<()> {
    let exams = session.upcoming(from, limit);
    writeln!(out, "Upcoming exams for {} from {}", session.filter(), format_label(from))?;
    writeln!(out, "---")?;
    if exams.is_empty() {
        writeln!(out, "  No upcoming exams.")?;
    } else {
        write_exam_header(out)?;
        for exam in &exams {
            write_exam_row(exam, out)?;
        }
    }
    writeln!(out, "---")?;
    writeln!(out, "Showing {} exam(s)", exams.len())?;
    write_rejected_note(session.index(), out)?;
    Ok(())
}
