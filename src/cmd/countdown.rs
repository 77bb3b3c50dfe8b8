use crate::calc::dates::{CalendarInstant, format_label};
use crate::calc::{CountdownTicker, ScheduleIndex, ScheduleSession};
use crate::cmd::Context;
use anyhow::{Context as _, Result};
use chrono::NaiveDateTime;
use std::io::Write;
use std::sync::mpsc;
use std::time::Duration;

pub fn run(ctx: &Context, watch: bool, interval: u64, ticks: Option<u64>) -> Result<()> {
    let session = ctx.session()?;
    let now = super::now();
    let fallback = fallback_for(ctx, &session, now)?;
    write_next_exam(&session, fallback.as_ref(), now, &mut std::io::stdout())?;

    let Some(next) = session.next_exam(now.date(), fallback.as_ref()) else {
        return Ok(());
    };
    if watch {
        let target = next.exam.date.instant();
        watch_countdown(target, Duration::from_secs(interval.max(1)), ticks)?;
    }
    Ok(())
}

/// Loads the unfiltered snapshot only when the filter has nothing left.
pub(crate) fn fallback_for(
    ctx: &Context,
    session: &ScheduleSession,
    now: NaiveDateTime,
) -> Result<Option<ScheduleIndex>> {
    if session.upcoming(now.date(), 1).is_empty() {
        Ok(Some(ctx.fallback_index()?))
    } else {
        Ok(None)
    }
}

/// Prints a fresh countdown every `interval` until the exam starts or
/// `ticks` updates have been shown.
fn watch_countdown(target: NaiveDateTime, interval: Duration, ticks: Option<u64>) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let ticker = CountdownTicker::spawn(target, interval, super::now, move |c| tx.send(c).is_ok())
        .context("failed to start countdown ticker")?;
    let mut out = std::io::stdout();
    let mut seen = 0u64;
    for c in rx.iter() {
        writeln!(out, "{:<14} {}", "Countdown:", c)?;
        seen += 1;
        if c.is_zero() || ticks.is_some_and(|limit| seen >= limit) {
            break;
        }
    }
    ticker.cancel();
    Ok(())
}

pub(crate) fn write_next_exam<W: Write>(
    session: &ScheduleSession,
    fallback: Option<&ScheduleIndex>,
    now: NaiveDateTime,
    out: &mut W,
) -> Result<()> {
    let Some(next) = session.next_exam(now.date(), fallback) else {
        writeln!(out, "No upcoming exams.")?;
        return Ok(());
    };
    let exam = next.exam;
    writeln!(out, "{:<14} {} {}", "Next exam:", exam.subject_code, exam.name)?;
    if exam.time.is_empty() {
        writeln!(out, "{:<14} {}", "Date:", format_label(exam.date))?;
    } else {
        writeln!(out, "{:<14} {} at {}", "Date:", format_label(exam.date), exam.time)?;
    }
    if let Some(venue) = &exam.venue {
        writeln!(out, "{:<14} {}", "Venue:", venue)?;
    }
    if let Some(c) = session.countdown(now, fallback) {
        writeln!(out, "{:<14} {}", "Countdown:", c)?;
    }
    if next.fallback {
        writeln!(
            out,
            "(nothing upcoming for {}; showing {} semester {})",
            session.filter(),
            exam.course,
            exam.semester
        )?;
    }
    Ok(())
}
