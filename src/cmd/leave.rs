use crate::calc::dates::format_label;
use crate::calc::{ScheduleSession, SelectionState};
use crate::cmd::Context;
use anyhow::Result;
use chrono::NaiveDate;

pub fn run(ctx: &Context, dates: &[NaiveDate]) -> Result<()> {
    let mut session = ctx.session()?;
    pick(&mut session, dates);
    write_leave(&session, &mut std::io::stdout())
}

/// Turns the picker on and feeds every date as a click, in order.
pub(crate) fn pick(session: &mut ScheduleSession, dates: &[NaiveDate]) {
    if !session.picker().is_enabled() {
        session.picker_mut().toggle();
    }
    for date in dates {
        session.click(*date);
    }
}

pub(crate) fn write_leave<W: std::io::Write>(session: &ScheduleSession, out: &mut W) -> Result<()> {
    writeln!(out, "Study leave for {}", session.filter())?;
    writeln!(out, "---")?;
    match session.selection() {
        SelectionState::Empty => writeln!(out, "No dates selected.")?,
        SelectionState::OneSelected { date, exam } => {
            let code = exam
                .as_ref()
                .map(|e| format!(" ({} {})", e.subject_code, e.name))
                .unwrap_or_default();
            writeln!(out, "{:<14} {}{}", "Selected:", format_label(*date), code)?;
            writeln!(out, "Pick a second date to measure the study leave.")?;
        }
        SelectionState::Pair { .. } => {
            if let Some(leave) = session.study_leave() {
                writeln!(out, "{:<14} {}", "From:", leave.start_label)?;
                writeln!(out, "{:<14} {}", "To:", leave.end_label)?;
                writeln!(
                    out,
                    "{:<14} {}d {}h {}m",
                    "Study leave:", leave.days, leave.hours, leave.minutes
                )?;
            }
        }
    }
    Ok(())
}
