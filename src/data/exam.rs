use crate::calc::dates::parse_calendar_date;
use crate::data::filter::Filter;
use crate::data::persistence::{Format, Persistable};
use crate::error::InvalidDateError;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const SEMESTERS: std::ops::RangeInclusive<u8> = 1..=8;

fn default_semester() -> u8 {
    1
}

/// Reads any JSON value as text so a stray `null` or number in one record
/// cannot fail the whole store. `null` becomes empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_venue<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let venue = lenient_string(deserializer)?;
    Ok((!venue.is_empty()).then_some(venue))
}

/// Anything other than a positive whole number that fits a `u8` (or a string
/// holding one) counts as semester 1.
fn lenient_semester<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let semester = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u8>().ok(),
        _ => None,
    };
    Ok(semester.filter(|s| *s != 0).unwrap_or_else(default_semester))
}

/// An exam as stored, before its date has been checked.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(
        default,
        deserialize_with = "lenient_venue",
        skip_serializing_if = "Option::is_none"
    )]
    pub venue: Option<String>,
    #[serde(default = "default_semester", deserialize_with = "lenient_semester")]
    pub semester: u8,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course: String,
}

impl ExamRecord {
    pub fn new(name: &str, subject_code: &str, date: &str, time: &str, semester: u8, course: &str) -> Self {
        ExamRecord {
            id: String::new(),
            name: name.to_string(),
            subject_code: subject_code.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            venue: None,
            semester,
            course: course.to_string(),
        }
    }

    pub fn with_venue(mut self, venue: &str) -> Self {
        self.venue = Some(venue.to_string());
        self
    }
}

/// An exam whose date parsed. Only these reach the schedule index.
#[derive(Clone, Debug, PartialEq)]
pub struct Exam {
    pub id: String,
    pub name: String,
    pub subject_code: String,
    pub date: NaiveDate,
    pub time: String,
    pub venue: Option<String>,
    pub semester: u8,
    pub course: String,
}

impl Exam {
    pub fn info(&self) -> ExamInfo {
        ExamInfo {
            name: self.name.clone(),
            subject_code: self.subject_code.clone(),
        }
    }
}

impl TryFrom<&ExamRecord> for Exam {
    type Error = InvalidDateError;

    fn try_from(record: &ExamRecord) -> Result<Self, Self::Error> {
        Ok(Exam {
            id: record.id.clone(),
            name: record.name.clone(),
            subject_code: record.subject_code.clone(),
            date: parse_calendar_date(&record.date)?,
            time: record.time.clone(),
            venue: record.venue.clone(),
            semester: record.semester,
            course: record.course.clone(),
        })
    }
}

/// Display projection of an exam attached to a selected date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamInfo {
    pub name: String,
    pub subject_code: String,
}

/// Field-by-field edit; `None` leaves the field alone, an empty venue clears it.
#[derive(Clone, Debug, Default)]
pub struct ExamPatch {
    pub name: Option<String>,
    pub subject_code: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub semester: Option<u8>,
    pub course: Option<String>,
}

impl ExamPatch {
    fn apply(self, record: &mut ExamRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(code) = self.subject_code {
            record.subject_code = code;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(time) = self.time {
            record.time = time;
        }
        if let Some(venue) = self.venue {
            record.venue = if venue.trim().is_empty() { None } else { Some(venue) };
        }
        if let Some(semester) = self.semester {
            record.semester = semester;
        }
        if let Some(course) = self.course {
            record.course = course;
        }
    }
}

/// Checks applied when an administrator writes a record. Records already in
/// the store are never rejected on load; the schedule index drops bad dates.
pub fn validate(record: &ExamRecord) -> Result<()> {
    if record.name.trim().is_empty() {
        bail!("exam name must not be empty");
    }
    if record.subject_code.trim().is_empty() {
        bail!("subject code must not be empty");
    }
    if !SEMESTERS.contains(&record.semester) {
        bail!("semester {} is outside 1-8", record.semester);
    }
    parse_calendar_date(&record.date)?;
    Ok(())
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct ExamData {
    pub exams: Vec<ExamRecord>,
}

impl Persistable for ExamData {
    fn filename() -> &'static str {
        "exams.json"
    }
    fn format() -> Format {
        Format::Json
    }
}

impl ExamData {
    /// Validates the record, assigns a fresh id and appends it.
    pub fn add(&mut self, mut record: ExamRecord) -> Result<&ExamRecord> {
        validate(&record)?;
        record.id = uuid::Uuid::new_v4().to_string();
        self.exams.push(record);
        Ok(&self.exams[self.exams.len() - 1])
    }

    pub fn find(&self, id: &str) -> Option<&ExamRecord> {
        self.exams.iter().find(|e| e.id == id)
    }

    pub fn update(&mut self, id: &str, patch: ExamPatch) -> Result<&ExamRecord> {
        let Some(pos) = self.exams.iter().position(|e| e.id == id) else {
            bail!("exam '{}' not found", id);
        };
        let mut edited = self.exams[pos].clone();
        patch.apply(&mut edited);
        validate(&edited)?;
        self.exams[pos] = edited;
        Ok(&self.exams[pos])
    }

    pub fn remove(&mut self, id: &str) -> Result<ExamRecord> {
        match self.exams.iter().position(|e| e.id == id) {
            Some(pos) => Ok(self.exams.remove(pos)),
            None => bail!("exam '{}' not found", id),
        }
    }

    /// Drops every record, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.exams.len();
        self.exams.clear();
        count
    }

    pub fn matching(&self, filter: &Filter) -> Vec<ExamRecord> {
        self.exams
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }
}
