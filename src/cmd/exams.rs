use crate::calc::dates::parse_calendar_date;
use crate::data::{ExamData, Filter, Persistable};
use anyhow::Result;

/// Lists stored records with their ids. `filter` narrows the list; `None`
/// shows the whole store.
pub fn run(filter: Option<&Filter>) -> Result<()> {
    let data = ExamData::load()?;
    write_exams(&data, filter, &mut std::io::stdout())
}

pub(crate) fn write_exams<W: std::io::Write>(
    data: &ExamData,
    filter: Option<&Filter>,
    out: &mut W,
) -> Result<()> {
    match filter {
        Some(f) => writeln!(out, "Exams for {f}")?,
        None => writeln!(out, "Exams")?,
    }
    writeln!(out, "---")?;
    writeln!(
        out,
        "  {:<36} {:<12} {:<7} {:<10} {:<6} {:<4} {}",
        "ID", "Date", "Time", "Code", "Course", "Sem", "Name"
    )?;
    let mut shown = 0;
    let mut invalid = 0;
    for e in data.exams.iter().filter(|e| filter.is_none_or(|f| f.matches(e))) {
        let flag = if parse_calendar_date(&e.date).is_err() {
            invalid += 1;
            "  [invalid date]"
        } else {
            ""
        };
        writeln!(
            out,
            "  {:<36} {:<12} {:<7} {:<10} {:<6} {:<4} {}{}",
            e.id, e.date, e.time, e.subject_code, e.course, e.semester, e.name, flag
        )?;
        shown += 1;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} exam(s)", shown)?;
    if invalid > 0 {
        writeln!(out, "{} with an invalid date (hidden from the calendar)", invalid)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::fixtures;

    fn data() -> ExamData {
        let mut data = ExamData { exams: fixtures::records() };
        for (i, e) in data.exams.iter_mut().enumerate() {
            e.id = format!("id-{i}");
        }
        data
    }

    #[test]
    fn test_write_exams_empty() {
        let mut buf = Vec::new();
        write_exams(&ExamData::default(), None, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Total: 0 exam(s)"));
    }

    #[test]
    fn test_write_exams_shows_raw_records_including_bad_dates() {
        let mut buf = Vec::new();
        write_exams(&data(), None, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("id-0"));
        assert!(out.contains("someday"));
        assert!(out.contains("Broken Record  [invalid date]"));
        assert!(out.contains("Total: 5 exam(s)"));
        assert!(out.contains("1 with an invalid date"));
    }

    #[test]
    fn test_write_exams_filtered() {
        let mut buf = Vec::new();
        write_exams(&data(), Some(&Filter::new("CSE", 4)), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Exams for CSE semester 4"));
        assert!(out.contains("MAT206"));
        assert!(!out.contains("CST301"));
        assert!(out.contains("Total: 1 exam(s)"));
        assert!(!out.contains("invalid"));
    }
}
