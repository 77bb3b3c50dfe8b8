use crate::calc::{ScheduleSession, SortDirection, SortKey};
use crate::cmd::{Context, write_exam_header, write_exam_row, write_rejected_note};
use anyhow::Result;

pub fn run(ctx: &Context, key: SortKey, direction: SortDirection) -> Result<()> {
    let session = ctx.session()?;
    write_table(&session, key, direction, &mut std::io::stdout())
}

pub(crate) fn write_table<W: std::io::Write>(
    session: &ScheduleSession,
    key: SortKey,
    direction: SortDirection,
    out: &mut W,
) -> Result<()> {
    let rows = session.sorted_table(key, direction);
    writeln!(out, "Exam timetable for {}", session.filter())?;
    writeln!(out, "---")?;
    if session.index().is_empty() {
        writeln!(out, "  No exams.")?;
    } else {
        write_exam_header(out)?;
        for exam in &rows {
            write_exam_row(exam, out)?;
        }
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} exam(s)", rows.len())?;
    write_rejected_note(session.index(), out)?;
    Ok(())
}
