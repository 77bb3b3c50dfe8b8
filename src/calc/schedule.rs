use crate::calc::dates::CalendarInstant;
use crate::data::exam::{Exam, ExamRecord};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    #[default]
    Date,
    SubjectCode,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortKey {
    fn compare(self, a: &Exam, b: &Exam) -> Ordering {
        match self {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::SubjectCode => a.subject_code.cmp(&b.subject_code),
            SortKey::Name => a.name.cmp(&b.name),
        }
    }
}

/// Read-only view over one snapshot of exams.
///
/// Records whose date does not parse are dropped when the index is built.
/// Everything else keeps its input order, which is what every tie-break
/// falls back to. A new snapshot means a new index.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    exams: Vec<Exam>,
    by_day: HashMap<NaiveDate, usize>,
    rejected: usize,
}

impl ScheduleIndex {
    pub fn build(records: &[ExamRecord]) -> Self {
        let mut exams = Vec::with_capacity(records.len());
        let mut rejected = 0;
        for record in records {
            match Exam::try_from(record) {
                Ok(exam) => exams.push(exam),
                Err(e) => {
                    warn!(id = %record.id, name = %record.name, error = %e, "dropping exam record");
                    rejected += 1;
                }
            }
        }

        // First exam on a day wins the tile.
        let mut by_day = HashMap::new();
        for (i, exam) in exams.iter().enumerate() {
            if by_day.contains_key(&exam.date) {
                debug!(id = %exam.id, date = %exam.date, "second exam on one day, tile keeps the first");
                continue;
            }
            by_day.insert(exam.date, i);
        }

        debug!(accepted = exams.len(), rejected, days = by_day.len(), "built schedule index");
        ScheduleIndex {
            exams,
            by_day,
            rejected,
        }
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    /// Number of records dropped for an unparsable date.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    /// The exam shown on a calendar tile. With several exams on one day the
    /// earliest in input order is returned.
    pub fn tile_exam<T: CalendarInstant>(&self, date: T) -> Option<&Exam> {
        self.by_day
            .get(&date.calendar_day())
            .map(|&i| &self.exams[i])
    }

    /// Exams on or after `reference`, soonest first, at most `limit` of them.
    pub fn upcoming<T: CalendarInstant>(&self, reference: T, limit: usize) -> Vec<&Exam> {
        let from = reference.calendar_day();
        let mut found: Vec<&Exam> = self.exams.iter().filter(|e| e.date >= from).collect();
        found.sort_by(|a, b| SortKey::Date.compare(a, b));
        found.truncate(limit);
        found
    }

    /// Full table ordering. Descending is the ascending order reversed, so
    /// flipping direction never reshuffles ties.
    pub fn sorted_table(&self, key: SortKey, direction: SortDirection) -> Vec<&Exam> {
        let mut rows: Vec<&Exam> = self.exams.iter().collect();
        rows.sort_by(|a, b| key.compare(a, b));
        if direction == SortDirection::Desc {
            rows.reverse();
        }
        rows
    }
}
