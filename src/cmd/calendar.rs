use crate::calc::ScheduleSession;
use crate::cmd::Context;
use crate::cmd::leave::pick;
use crate::ui::calendar::write_month;
use anyhow::{Context as _, Result};
use chrono::{Datelike, NaiveDate};

pub fn run(ctx: &Context, month: Option<&str>, leave: &[NaiveDate]) -> Result<()> {
    let mut session = ctx.session()?;
    let today = super::today();
    let first = match month {
        Some(m) => parse_month(m)?,
        None => first_of_month(leave.first().copied().unwrap_or(today)),
    };
    if !leave.is_empty() {
        pick(&mut session, leave);
    }
    write_calendar(&session, first, today, &mut std::io::stdout())
}

/// Parses `YYYY-MM` into the first day of that month.
pub(crate) fn parse_month(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{}', expected YYYY-MM", raw))
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub(crate) fn write_calendar<W: std::io::Write>(
    session: &ScheduleSession,
    first: NaiveDate,
    today: NaiveDate,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Exams for {}", session.filter())?;
    write_month(session, first, today, out)?;
    if let Some(leave) = session.study_leave() {
        writeln!(
            out,
            "Study leave: {} to {} = {}d {}h {}m",
            leave.start_label, leave.end_label, leave.days, leave.hours, leave.minutes
        )?;
    }
    Ok(())
}
