pub mod app_settings;
pub mod exam;
pub mod filter;
pub mod persistence;
pub mod repository;

pub use app_settings::AppSettings;
pub use exam::{Exam, ExamData, ExamPatch, ExamRecord};
pub use filter::Filter;
pub use persistence::Persistable;
pub use repository::{ExamRepository, FileExamRepository};
