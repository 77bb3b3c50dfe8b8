use crate::data::AppSettings;
use crate::data::exam::SEMESTERS;
use anyhow::{Result, bail};

pub fn run(set_course: Option<&str>, set_semester: Option<u8>) -> Result<()> {
    let mut settings = AppSettings::load()?;
    let changed = apply(&mut settings, set_course, set_semester)?;
    if changed {
        settings.save()?;
    }
    write_filter(&settings, changed, &mut std::io::stdout())
}

/// Applies the requested changes. Returns whether anything was set.
pub(crate) fn apply(
    settings: &mut AppSettings,
    course: Option<&str>,
    semester: Option<u8>,
) -> Result<bool> {
    if let Some(s) = semester.filter(|s| !SEMESTERS.contains(s)) {
        bail!("semester {} is outside 1-8", s);
    }
    if let Some(c) = course {
        if c.trim().is_empty() {
            bail!("course must not be empty");
        }
        settings.course = c.trim().to_string();
    }
    if let Some(s) = semester {
        settings.semester = s;
    }
    Ok(course.is_some() || semester.is_some())
}

pub(crate) fn write_filter<W: std::io::Write>(settings: &AppSettings, changed: bool, out: &mut W) -> Result<()> {
    if changed {
        writeln!(out, "Saved filter: {}", settings.filter())?;
    } else {
        writeln!(out, "Filter: {}", settings.filter())?;
    }
    writeln!(out, "{:<16} {}", "Course:", settings.course)?;
    writeln!(out, "{:<16} {}", "Semester:", settings.semester)?;
    writeln!(out, "{:<16} {}", "Upcoming limit:", settings.upcoming_limit)?;
    Ok(())
}
