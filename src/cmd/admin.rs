//! Store edits behind `add`, `update` and `remove`. Each loads `exams.json`,
//! applies one change, and writes it back only if the change succeeded.

use crate::data::{ExamData, ExamPatch, ExamRecord, Persistable};
use anyhow::Result;
use std::io::Write;
use tracing::info;

fn with_store<F>(edit: F) -> Result<()>
where
    F: FnOnce(&mut ExamData, &mut std::io::Stdout) -> Result<()>,
{
    let mut data = ExamData::load()?;
    edit(&mut data, &mut std::io::stdout())?;
    data.save()
}

pub fn run_add(record: ExamRecord) -> Result<()> {
    with_store(|data, out| add_exam(data, record, out))
}

pub fn run_update(id: &str, patch: ExamPatch) -> Result<()> {
    with_store(|data, out| update_exam(data, id, patch, out))
}

pub fn run_remove(id: &str) -> Result<()> {
    with_store(|data, out| remove_exam(data, id, out))
}

pub fn run_remove_all() -> Result<()> {
    with_store(remove_all)
}

pub(crate) fn add_exam<W: Write>(data: &mut ExamData, record: ExamRecord, out: &mut W) -> Result<()> {
    let added = data.add(record)?;
    info!(id = %added.id, code = %added.subject_code, "added exam");
    writeln!(out, "Added {} {} on {} ({})", added.subject_code, added.name, added.date, added.id)?;
    Ok(())
}

pub(crate) fn update_exam<W: Write>(
    data: &mut ExamData,
    id: &str,
    patch: ExamPatch,
    out: &mut W,
) -> Result<()> {
    let before = data.find(id).map(|e| e.date.clone());
    let updated = data.update(id, patch)?;
    info!(id, "updated exam");
    match before {
        Some(old) if old != updated.date => writeln!(
            out,
            "Updated {} {}, moved from {} to {}",
            updated.subject_code, updated.name, old, updated.date
        )?,
        _ => writeln!(out, "Updated {} {} on {}", updated.subject_code, updated.name, updated.date)?,
    }
    Ok(())
}

pub(crate) fn remove_exam<W: Write>(data: &mut ExamData, id: &str, out: &mut W) -> Result<()> {
    let removed = data.remove(id)?;
    info!(id, "removed exam");
    writeln!(out, "Removed {} {}", removed.subject_code, removed.name)?;
    Ok(())
}

pub(crate) fn remove_all<W: Write>(data: &mut ExamData, out: &mut W) -> Result<()> {
    let count = data.clear();
    info!(count, "removed all exams");
    writeln!(out, "Removed {} exam(s)", count)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rec(name: &str, code: &str, date: &str) -> ExamRecord {
        ExamRecord::new(name, code, date, "09:30", 5, "CSE")
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_add_exam_reports_new_id() {
        let mut data = ExamData::default();
        let mut buf = Vec::new();
        add_exam(&mut data, rec("Computer Networks", "CST301", "2025-04-15"), &mut buf).unwrap();
        let id = data.exams[0].id.clone();
        assert!(!id.is_empty());
        let out = output(buf);
        assert!(out.contains("Added CST301 Computer Networks on 2025-04-15"));
        assert!(out.contains(&id));
    }

    #[test]
    fn test_add_exam_rejects_bad_date_and_leaves_store() {
        let mut data = ExamData::default();
        let mut buf = Vec::new();
        let err = add_exam(&mut data, rec("Networks", "CST301", "15/04/2025"), &mut buf).unwrap_err();
        assert!(err.to_string().contains("15/04/2025"));
        assert!(data.exams.is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_update_exam_changes_fields() {
        let mut data = ExamData::default();
        data.add(rec("Networks", "CST301", "2025-04-15")).unwrap();
        let id = data.exams[0].id.clone();
        let patch = ExamPatch {
            date: Some("2025-04-16".to_string()),
            venue: Some("Main Block Room 201".to_string()),
            ..ExamPatch::default()
        };
        let mut buf = Vec::new();
        update_exam(&mut data, &id, patch, &mut buf).unwrap();
        assert_eq!(data.exams[0].date, "2025-04-16");
        assert_eq!(data.exams[0].venue.as_deref(), Some("Main Block Room 201"));
        assert!(output(buf).contains("Updated CST301 Networks, moved from 2025-04-15 to 2025-04-16"));

        let mut buf = Vec::new();
        let rename = ExamPatch {
            name: Some("Computer Networks".to_string()),
            ..ExamPatch::default()
        };
        update_exam(&mut data, &id, rename, &mut buf).unwrap();
        assert!(output(buf).contains("Updated CST301 Computer Networks on 2025-04-16"));
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let mut data = ExamData::default();
        let err = update_exam(&mut data, "nope", ExamPatch::default(), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_remove_exam_and_remove_all() {
        let mut data = ExamData::default();
        data.add(rec("Networks", "CST301", "2025-04-15")).unwrap();
        data.add(rec("Databases", "CST303", "2025-04-17")).unwrap();
        let id = data.exams[0].id.clone();

        let mut buf = Vec::new();
        remove_exam(&mut data, &id, &mut buf).unwrap();
        assert_eq!(data.exams.len(), 1);
        assert!(output(buf).contains("Removed CST301 Networks"));
        assert!(remove_exam(&mut data, &id, &mut Vec::new()).is_err());

        let mut buf = Vec::new();
        remove_all(&mut data, &mut buf).unwrap();
        assert!(data.exams.is_empty());
        assert!(output(buf).contains("Removed 1 exam(s)"));
    }

    #[test]
    fn test_added_exam_survives_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let mut data = ExamData::default();
        add_exam(&mut data, rec("Networks", "CST301", "2025-04-15"), &mut Vec::new()).unwrap();
        data.save_to(tmp.path()).unwrap();
        let loaded = ExamData::load_from(tmp.path()).unwrap();
        assert_eq!(loaded.exams, data.exams);
    }
}
