use crate::calc::{ScheduleIndex, ScheduleSession};
use crate::cmd::countdown::{fallback_for, write_next_exam};
use crate::cmd::upcoming::write_upcoming;
use crate::cmd::Context;
use crate::ui::calendar::write_month;
use anyhow::Result;
use chrono::{Datelike, NaiveDateTime};

/// Dashboard: next exam with its countdown, the upcoming list, and this
/// month's grid. A store that cannot be read still renders, with the error
/// on top.
pub fn run(ctx: &Context) -> Result<()> {
    let session = ctx.load_session();
    let now = super::now();
    let fallback = match session.error() {
        Some(_) => None,
        None => fallback_for(ctx, &session, now)?,
    };
    write_dashboard(
        &session,
        fallback.as_ref(),
        now,
        ctx.settings.upcoming_limit,
        &mut std::io::stdout(),
    )
}

pub(crate) fn write_dashboard<W: std::io::Write>(
    session: &ScheduleSession,
    fallback: Option<&ScheduleIndex>,
    now: NaiveDateTime,
    limit: usize,
    out: &mut W,
) -> Result<()> {
    let today = now.date();
    if session.is_loading() {
        writeln!(out, "Loading exams for {}...", session.filter())?;
    }
    if let Some(e) = session.error() {
        writeln!(out, "Could not load exams for {}: {}", session.filter(), e)?;
        writeln!(out)?;
    }
    write_next_exam(session, fallback, now, out)?;
    writeln!(out)?;
    write_upcoming(session, today, limit, out)?;
    writeln!(out)?;
    let first = today.with_day(1).unwrap_or(today);
    write_month(session, first, today, out)?;
    Ok(())
}
