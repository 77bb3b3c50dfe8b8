pub mod admin;
pub mod calendar;
pub mod countdown;
pub mod exams;
pub mod filter;
pub mod init;
pub mod leave;
pub mod root;
pub mod table;
pub mod upcoming;

use crate::calc::dates::format_label;
use crate::calc::{FetchOutcome, ScheduleIndex, ScheduleSession};
use crate::data::persistence::get_data_dir;
use crate::data::{AppSettings, Exam, ExamRepository, FileExamRepository, Filter};
use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a read-only command needs: where the data lives, the stored
/// settings, and the filter after command-line overrides.
#[derive(Debug, Clone)]
pub struct Context {
    pub dir: PathBuf,
    pub settings: AppSettings,
    pub filter: Filter,
}

impl Context {
    pub fn load(course: Option<&str>, semester: Option<u8>) -> Result<Self> {
        Self::in_dir(&get_data_dir()?, course, semester)
    }

    pub(crate) fn in_dir(dir: &Path, course: Option<&str>, semester: Option<u8>) -> Result<Self> {
        let settings = AppSettings::load_from(dir)?;
        let filter = settings.filter_with(course, semester);
        Ok(Context {
            dir: dir.to_path_buf(),
            settings,
            filter,
        })
    }

    pub fn repository(&self) -> FileExamRepository {
        FileExamRepository::new(&self.dir)
    }

    /// A session after one fetch for the current filter. A failed fetch is
    /// kept on the session as its error.
    pub fn load_session(&self) -> ScheduleSession {
        let mut session = ScheduleSession::new(self.filter.clone());
        match session.refresh(&self.repository(), self.filter.clone()) {
            Ok(FetchOutcome::Applied { accepted, rejected }) => {
                debug!(accepted, rejected, filter = %self.filter, "loaded exams")
            }
            Ok(FetchOutcome::Stale) => {}
            Err(e) => debug!(error = %e, "session left with fetch error"),
        }
        session
    }

    /// Like [`Context::load_session`], but a failed fetch is an error.
    pub fn session(&self) -> Result<ScheduleSession> {
        let session = self.load_session();
        if let Some(e) = session.error() {
            return Err(e.clone()).with_context(|| format!("could not load exams for {}", self.filter));
        }
        Ok(session)
    }

    /// Every exam regardless of filter, for the next-exam fallback.
    pub fn fallback_index(&self) -> Result<ScheduleIndex> {
        let records = self
            .repository()
            .fetch_all()
            .context("could not load exams for the fallback search")?;
        Ok(ScheduleIndex::build(&records))
    }
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn write_exam_header<W: std::io::Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        "  {:<20} {:<7} {:<10} {:<32} {}",
        "Date", "Time", "Code", "Name", "Venue"
    )
}

pub(crate) fn write_exam_row<W: std::io::Write>(exam: &Exam, out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        "  {:<20} {:<7} {:<10} {:<32} {}",
        format_label(exam.date),
        exam.time,
        exam.subject_code,
        exam.name,
        exam.venue.as_deref().unwrap_or("-")
    )
}

/// Trailing note for records the index refused.
pub(crate) fn write_rejected_note<W: std::io::Write>(index: &ScheduleIndex, out: &mut W) -> std::io::Result<()> {
    if index.rejected() > 0 {
        writeln!(out, "({} record(s) skipped: unreadable date)", index.rejected())?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::calc::ScheduleSession;
    use crate::data::{ExamData, ExamRecord, Filter, Persistable};
    use crate::cmd::Context;
    use tempfile::TempDir;

    pub fn records() -> Vec<ExamRecord> {
        vec![
            ExamRecord::new("Computer Networks", "CST301", "2024-04-15", "09:30", 5, "CSE")
                .with_venue("Main Block Room 201"),
            ExamRecord::new("Database Management", "CST303", "2024-04-17", "09:30", 5, "CSE")
                .with_venue("Main Block Room 202"),
            ExamRecord::new("Operating Systems", "CST305", "2024-04-19", "09:30", 5, "CSE"),
            ExamRecord::new("Graph Theory", "MAT206", "2024-05-06", "13:30", 4, "CSE"),
            ExamRecord::new("Broken Record", "CST399", "someday", "09:30", 5, "CSE"),
        ]
    }

    pub fn seeded_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        ExamData { exams: records() }.save_to(tmp.path()).unwrap();
        tmp
    }

    pub fn context(tmp: &TempDir) -> Context {
        Context::in_dir(tmp.path(), Some("CSE"), Some(5)).unwrap()
    }

    pub fn session(filter: Filter) -> ScheduleSession {
        let tmp = seeded_dir();
        let ctx = Context::in_dir(tmp.path(), Some(&filter.course), Some(filter.semester)).unwrap();
        ctx.session().unwrap()
    }
}
