use crate::data::exam::ExamRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The course and semester a student is looking at.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Filter {
    pub course: String,
    pub semester: u8,
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            course: "CSE".to_string(),
            semester: 4,
        }
    }
}

impl Filter {
    pub fn new(course: &str, semester: u8) -> Self {
        Filter {
            course: course.to_string(),
            semester,
        }
    }

    pub fn matches(&self, record: &ExamRecord) -> bool {
        record.course == self.course && record.semester == self.semester
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} semester {}", self.course, self.semester)
    }
}
