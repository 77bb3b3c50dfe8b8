//! What a calendar screen holds on to between events: the filter, the
//! current index, the study-leave picker, and which fetch is the newest.

use crate::calc::countdown::{Countdown, countdown};
use crate::calc::schedule::{ScheduleIndex, SortDirection, SortKey};
use crate::calc::selection::{SelectionState, StudyLeave, StudyLeavePicker};
use crate::data::exam::{Exam, ExamRecord};
use crate::data::filter::Filter;
use crate::data::repository::ExamRepository;
use crate::error::FetchError;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

/// Handed out by [`ScheduleSession::begin_fetch`]; only the newest ticket's
/// result is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    filter: Filter,
}

impl FetchTicket {
    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { accepted: usize, rejected: usize },
    Stale,
}

/// The exam the header countdown points at.
#[derive(Debug, Clone, PartialEq)]
pub struct NextExam<'a> {
    pub exam: &'a Exam,
    /// True when nothing matched the filter and the exam came from the
    /// unfiltered fallback snapshot.
    pub fallback: bool,
}

#[derive(Debug, Default)]
pub struct ScheduleSession {
    filter: Filter,
    index: ScheduleIndex,
    generation: u64,
    pending: bool,
    error: Option<FetchError>,
    picker: StudyLeavePicker,
}

impl ScheduleSession {
    pub fn new(filter: Filter) -> Self {
        ScheduleSession {
            filter,
            ..Self::default()
        }
    }

    /// Starts a fetch for `filter`. Any fetch still in flight becomes stale.
    /// The current index stays in place until the result arrives.
    pub fn begin_fetch(&mut self, filter: Filter) -> FetchTicket {
        self.generation += 1;
        self.pending = true;
        self.filter = filter.clone();
        debug!(generation = self.generation, %filter, "fetch started");
        FetchTicket {
            generation: self.generation,
            filter,
        }
    }

    /// Applies a fetch result. Results for anything but the newest ticket are
    /// discarded. A failure leaves the previous index in place and is kept as
    /// the session's error until the next successful fetch.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<ExamRecord>, FetchError>,
    ) -> Result<FetchOutcome, FetchError> {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                newest = self.generation,
                "discarding stale fetch"
            );
            return Ok(FetchOutcome::Stale);
        }
        self.pending = false;
        match result {
            Ok(records) => {
                self.index = ScheduleIndex::build(&records);
                self.error = None;
                Ok(FetchOutcome::Applied {
                    accepted: self.index.len(),
                    rejected: self.index.rejected(),
                })
            }
            Err(e) => {
                warn!(filter = %ticket.filter, error = %e, "fetch failed");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Fetches synchronously from `repo` and applies the result.
    pub fn refresh<R: ExamRepository + ?Sized>(
        &mut self,
        repo: &R,
        filter: Filter,
    ) -> Result<FetchOutcome, FetchError> {
        let ticket = self.begin_fetch(filter);
        let filter = ticket.filter();
        let result = repo.fetch_exams(&filter.course, filter.semester);
        self.complete_fetch(ticket, result)
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn index(&self) -> &ScheduleIndex {
        &self.index
    }

    pub fn tile_exam(&self, date: NaiveDate) -> Option<&Exam> {
        self.index.tile_exam(date)
    }

    pub fn upcoming(&self, reference: NaiveDate, limit: usize) -> Vec<&Exam> {
        self.index.upcoming(reference, limit)
    }

    pub fn sorted_table(&self, key: SortKey, direction: SortDirection) -> Vec<&Exam> {
        self.index.sorted_table(key, direction)
    }

    pub fn picker(&self) -> &StudyLeavePicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut StudyLeavePicker {
        &mut self.picker
    }

    /// A calendar click. The exam on that day, if any, rides along.
    pub fn click(&mut self, date: NaiveDate) -> bool {
        let exam = self.index.tile_exam(date).map(Exam::info);
        self.picker.click(date, exam)
    }

    pub fn selection(&self) -> &SelectionState {
        self.picker.state()
    }

    pub fn study_leave(&self) -> Option<&StudyLeave> {
        self.picker.study_leave()
    }

    /// Soonest exam on or after `today` for the current filter, else the
    /// soonest one in `fallback`.
    pub fn next_exam<'a>(
        &'a self,
        today: NaiveDate,
        fallback: Option<&'a ScheduleIndex>,
    ) -> Option<NextExam<'a>> {
        if let Some(exam) = self.index.upcoming(today, 1).into_iter().next() {
            return Some(NextExam {
                exam,
                fallback: false,
            });
        }
        fallback
            .and_then(|index| index.upcoming(today, 1).into_iter().next())
            .map(|exam| NextExam {
                exam,
                fallback: true,
            })
    }

    pub fn countdown(&self, now: NaiveDateTime, fallback: Option<&ScheduleIndex>) -> Option<Countdown> {
        self.next_exam(now.date(), fallback)
            .map(|next| countdown(next.exam.date, now))
    }
}
