//! Two-click study-leave picker.
//!
//! The first click anchors a date, the second closes the range (in either
//! order) and yields a [`StudyLeave`]. A third click starts over.

use crate::calc::dates::{format_label, split_duration};
use crate::data::exam::ExamInfo;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    OneSelected {
        date: NaiveDate,
        exam: Option<ExamInfo>,
    },
    Pair {
        start: NaiveDate,
        end: NaiveDate,
        start_exam: Option<ExamInfo>,
        end_exam: Option<ExamInfo>,
    },
}

/// How a calendar tile is highlighted for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMarker {
    Start,
    Between,
    End,
}

impl SelectionState {
    fn clicked(self, date: NaiveDate, exam: Option<ExamInfo>) -> SelectionState {
        match self {
            SelectionState::OneSelected {
                date: anchor,
                exam: anchor_exam,
            } if anchor != date => {
                let (start, start_exam, end, end_exam) = if anchor < date {
                    (anchor, anchor_exam, date, exam)
                } else {
                    (date, exam, anchor, anchor_exam)
                };
                SelectionState::Pair {
                    start,
                    end,
                    start_exam,
                    end_exam,
                }
            }
            // Empty, a finished pair, or the anchor clicked again: select afresh.
            _ => SelectionState::OneSelected { date, exam },
        }
    }

    pub fn marker(&self, day: NaiveDate) -> Option<TileMarker> {
        match self {
            SelectionState::Empty => None,
            SelectionState::OneSelected { date, .. } => (*date == day).then_some(TileMarker::Start),
            SelectionState::Pair { start, end, .. } => {
                if day == *start {
                    Some(TileMarker::Start)
                } else if day == *end {
                    Some(TileMarker::End)
                } else if day > *start && day < *end {
                    Some(TileMarker::Between)
                } else {
                    None
                }
            }
        }
    }
}

/// Time between the two picked dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyLeave {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub start_label: String,
    pub end_label: String,
}

impl StudyLeave {
    pub fn between(
        start: NaiveDate,
        end: NaiveDate,
        start_exam: Option<&ExamInfo>,
        end_exam: Option<&ExamInfo>,
    ) -> Self {
        let split = split_duration(start, end);
        StudyLeave {
            days: split.days,
            hours: split.hours,
            minutes: split.minutes,
            start_label: label(start, start_exam),
            end_label: label(end, end_exam),
        }
    }
}

fn label(date: NaiveDate, exam: Option<&ExamInfo>) -> String {
    match exam {
        Some(info) => format!("{} ({})", format_label(date), info.subject_code),
        None => format_label(date),
    }
}

/// The picker as the calendar drives it: a mode switch plus the selection.
#[derive(Debug, Clone, Default)]
pub struct StudyLeavePicker {
    enabled: bool,
    state: SelectionState,
    leave: Option<StudyLeave>,
}

impl StudyLeavePicker {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the mode off always clears the selection.
    pub fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
        if !on {
            self.reset();
        }
    }

    pub fn toggle(&mut self) {
        self.set_enabled(!self.enabled);
    }

    pub fn reset(&mut self) {
        self.state = SelectionState::Empty;
        self.leave = None;
    }

    /// Feeds one date click. Returns false (and changes nothing) while the
    /// mode is off.
    pub fn click(&mut self, date: NaiveDate, exam: Option<ExamInfo>) -> bool {
        if !self.enabled {
            return false;
        }
        self.state = std::mem::take(&mut self.state).clicked(date, exam);
        self.leave = match &self.state {
            SelectionState::Pair {
                start,
                end,
                start_exam,
                end_exam,
            } => Some(StudyLeave::between(
                *start,
                *end,
                start_exam.as_ref(),
                end_exam.as_ref(),
            )),
            _ => None,
        };
        true
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn study_leave(&self) -> Option<&StudyLeave> {
        self.leave.as_ref()
    }

    pub fn marker(&self, day: NaiveDate) -> Option<TileMarker> {
        self.state.marker(day)
    }
}
