use crate::calc::dates::format_key;
use crate::data::{AppSettings, ExamData, ExamRecord, Persistable};
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use std::fs;
use std::path::Path;
use tracing::info;

pub fn run() -> Result<()> {
    let dir = crate::data::persistence::get_data_dir()?;
    fs::create_dir_all(&dir)?;
    if !run_in_dir(&dir, super::today())? {
        println!("Kept existing {}.", ExamData::filename());
    }
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes the default config into `dir`, and a sample exam store unless one
/// is already there. Returns whether the sample store was written.
pub(crate) fn run_in_dir(dir: &Path, today: NaiveDate) -> Result<bool> {
    write_config(dir)?;
    let wrote_exams = if dir.join(ExamData::filename()).exists() {
        info!(dir = %dir.display(), "exam store exists, leaving it alone");
        false
    } else {
        write_exams(dir, today)?;
        true
    };
    info!(dir = %dir.display(), "initialized data directory");
    Ok(wrote_exams)
}

fn write_config(dir: &Path) -> Result<()> {
    AppSettings::default().save_to(dir)
}

fn write_exams(dir: &Path, today: NaiveDate) -> Result<()> {
    let mut data = ExamData::default();
    for record in sample_exams(today) {
        data.add(record)?;
    }
    data.save_to(dir)
}

/// A fixed fifth-semester timetable plus a fourth-semester one placed a week
/// out from `today`, so the default filter has something to count down to.
fn sample_exams(today: NaiveDate) -> Vec<ExamRecord> {
    let mut exams = vec![
        ExamRecord::new("Computer Networks", "CST301", "2024-04-15", "09:30", 5, "CSE")
            .with_venue("Main Block Room 201"),
        ExamRecord::new("Database Management", "CST303", "2024-04-17", "09:30", 5, "CSE")
            .with_venue("Main Block Room 202"),
        ExamRecord::new("Operating Systems", "CST305", "2024-04-19", "09:30", 5, "CSE")
            .with_venue("Main Block Room 203"),
    ];
    let fourth = [
        (7, "Graph Theory", "MAT206"),
        (9, "Computer Organisation and Architecture", "CST202"),
        (11, "Database Management Systems", "CST204"),
        (14, "Operating Systems", "CST206"),
    ];
    for (offset, name, code) in fourth {
        let day = format_key(today + Duration::days(offset));
        exams.push(ExamRecord::new(name, code, &day, "09:30", 4, "CSE").with_venue("Main Block Room 101"));
    }
    exams
}
