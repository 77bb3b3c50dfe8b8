//! Boundary between the schedule engine and wherever exam records live.

use crate::data::exam::{ExamData, ExamRecord};
use crate::data::filter::Filter;
use crate::data::persistence::Persistable;
use crate::error::FetchError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub type FetchResult<T> = Result<T, FetchError>;

/// Source of raw exam records.
///
/// Implementations return records in storage order and do no date
/// validation; that belongs to the schedule index. Retrying is up to the
/// implementation, callers see a single success or failure.
pub trait ExamRepository {
    fn fetch_exams(&self, course: &str, semester: u8) -> FetchResult<Vec<ExamRecord>>;

    /// Every stored record regardless of course or semester.
    fn fetch_all(&self) -> FetchResult<Vec<ExamRecord>>;
}

/// Reads `exams.json` from a data directory.
#[derive(Debug, Clone)]
pub struct FileExamRepository {
    dir: PathBuf,
}

impl FileExamRepository {
    pub fn new(dir: &Path) -> Self {
        FileExamRepository {
            dir: dir.to_path_buf(),
        }
    }

    fn load(&self) -> FetchResult<ExamData> {
        let path = self.dir.join(ExamData::filename());
        if path.exists() && !path.is_file() {
            return Err(FetchError::Unavailable(format!(
                "{} is not a file",
                path.display()
            )));
        }
        ExamData::load_from(&self.dir).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to load exam store");
            if e.downcast_ref::<std::io::Error>().is_some() {
                FetchError::Unavailable(format!("{e:#}"))
            } else {
                FetchError::Malformed(format!("{e:#}"))
            }
        })
    }
}

impl ExamRepository for FileExamRepository {
    fn fetch_exams(&self, course: &str, semester: u8) -> FetchResult<Vec<ExamRecord>> {
        let records = self.load()?.matching(&Filter::new(course, semester));
        debug!(course, semester, count = records.len(), "fetched exams");
        Ok(records)
    }

    fn fetch_all(&self) -> FetchResult<Vec<ExamRecord>> {
        Ok(self.load()?.exams)
    }
}
