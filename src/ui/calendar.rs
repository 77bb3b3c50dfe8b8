//! Plain-text month grid. Each tile shows the day number, the subject code
//! of the exam on that day, and the study-leave marker:
//! `[` opens the range, `]` closes it, `~` fills the days in between.

use crate::calc::dates::same_calendar_day;
use crate::calc::{ScheduleSession, TileMarker};
use chrono::{Datelike, NaiveDate};
use std::io::Write;

const CELL_WIDTH: usize = 11;
const CODE_WIDTH: usize = 6;
const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

fn tile(day: NaiveDate, code: Option<&str>, marker: Option<TileMarker>, is_today: bool) -> String {
    let (open, close) = match marker {
        Some(TileMarker::Start) => ('[', ' '),
        Some(TileMarker::End) => (' ', ']'),
        Some(TileMarker::Between) => ('~', '~'),
        None => (' ', ' '),
    };
    let flag = if is_today { '*' } else { ' ' };
    let code: String = code.unwrap_or("").chars().take(CODE_WIDTH).collect();
    format!("{open}{:>2}{flag}{code:<CODE_WIDTH$}{close}", day.day())
}

/// Days of the month starting at `first`.
pub(crate) fn month_days(first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let month = first.month();
    first.iter_days().take_while(move |d| d.month() == month)
}

pub fn write_month<W: Write>(
    session: &ScheduleSession,
    first: NaiveDate,
    today: NaiveDate,
    out: &mut W,
) -> std::io::Result<()> {
    let title = first.format("%B %Y").to_string();
    writeln!(out, "{:^width$}", title, width = CELL_WIDTH * 7)?;
    let header: String = WEEKDAYS.iter().map(|w| format!("{w:^CELL_WIDTH$}")).collect();
    writeln!(out, "{}", header.trim_end())?;

    let lead = first.weekday().num_days_from_sunday() as usize;
    let mut row = " ".repeat(CELL_WIDTH * lead);
    let mut col = lead;
    for day in month_days(first) {
        let code = session.tile_exam(day).map(|e| e.subject_code.as_str());
        row.push_str(&tile(day, code, session.picker().marker(day), same_calendar_day(day, today)));
        col += 1;
        if col == 7 {
            writeln!(out, "{}", row.trim_end())?;
            row.clear();
            col = 0;
        }
    }
    if !row.is_empty() {
        writeln!(out, "{}", row.trim_end())?;
    }
    let in_month = session
        .index()
        .exams()
        .iter()
        .filter(|e| e.date.year() == first.year() && e.date.month() == first.month())
        .count();
    writeln!(out, "{} exam(s) this month", in_month)?;
    writeln!(out, "[ start   ] end   ~ study leave   * today")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::exam::ExamRecord;
    use crate::data::filter::Filter;
    use crate::data::repository::{ExamRepository, FetchResult};

    struct Fixed(Vec<ExamRecord>);

    impl ExamRepository for Fixed {
        fn fetch_exams(&self, _course: &str, _semester: u8) -> FetchResult<Vec<ExamRecord>> {
            Ok(self.0.clone())
        }
        fn fetch_all(&self) -> FetchResult<Vec<ExamRecord>> {
            Ok(self.0.clone())
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn session() -> ScheduleSession {
        let repo = Fixed(vec![
            ExamRecord::new("Computer Networks", "CST301", "2025-04-15", "09:30", 5, "CSE"),
            ExamRecord::new("Database Management", "CST303", "2025-04-17", "09:30", 5, "CSE"),
        ]);
        let mut s = ScheduleSession::new(Filter::new("CSE", 5));
        s.refresh(&repo, Filter::new("CSE", 5)).unwrap();
        s
    }

    fn render(s: &ScheduleSession, today: NaiveDate) -> String {
        let mut buf = Vec::new();
        write_month(s, d(2025, 4, 1), today, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_tile_formats() {
        assert_eq!(tile(d(2025, 4, 5), None, None, false), "  5        ");
        assert_eq!(tile(d(2025, 4, 15), Some("CST301"), Some(TileMarker::Start), true), "[15*CST301 ");
        assert_eq!(tile(d(2025, 4, 17), Some("LONGCODE99"), Some(TileMarker::End), false), " 17 LONGCO]");
        assert_eq!(tile(d(2025, 4, 16), None, Some(TileMarker::Between), false), "~16       ~");
    }

    #[test]
    fn test_month_days_covers_whole_month() {
        assert_eq!(month_days(d(2024, 2, 1)).count(), 29);
        assert_eq!(month_days(d(2025, 4, 1)).count(), 30);
        assert_eq!(month_days(d(2025, 12, 1)).last(), Some(d(2025, 12, 31)));
    }

    #[test]
    fn test_write_month_shows_exam_codes() {
        let out = render(&session(), d(2025, 1, 1));
        assert!(out.contains("April 2025"));
        assert!(out.contains("15 CST301"));
        assert!(out.contains("17 CST303"));
        // April 1st 2025 is a Tuesday: two blank cells lead the first row.
        let first_week = out.lines().nth(2).unwrap();
        assert!(first_week.starts_with(&" ".repeat(CELL_WIDTH * 2)));
        assert!(out.contains("2 exam(s) this month"));
        assert_eq!(out.lines().count(), 2 + 5 + 2);
    }

    #[test]
    fn test_write_month_marks_study_leave() {
        let mut s = session();
        s.picker_mut().set_enabled(true);
        s.click(d(2025, 4, 15));
        s.click(d(2025, 4, 17));
        let out = render(&s, d(2025, 4, 16));
        assert!(out.contains("[15 CST301"));
        assert!(out.contains("~16*      ~"));
        assert!(out.contains(" 17 CST303]"));
    }
}
