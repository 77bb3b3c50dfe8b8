use crate::data::filter::Filter;
use crate::data::persistence::{Format, Persistable};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_upcoming_limit() -> usize {
    5
}

/// Persisted viewing preferences. The engine never reads these directly;
/// commands turn them into a [`Filter`] and pass it in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    #[serde(default = "default_course")]
    pub course: String,
    #[serde(default = "default_semester")]
    pub semester: u8,
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
}

fn default_course() -> String {
    Filter::default().course
}

fn default_semester() -> u8 {
    Filter::default().semester
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            course: default_course(),
            semester: default_semester(),
            upcoming_limit: default_upcoming_limit(),
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
    fn format() -> Format {
        Format::Yaml
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings)
    }

    pub fn save(&self) -> Result<()> {
        SettingsWrapper {
            settings: self.clone(),
        }
        .save()
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(SettingsWrapper::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        SettingsWrapper {
            settings: self.clone(),
        }
        .save_to(dir)
    }

    pub fn filter(&self) -> Filter {
        Filter::new(&self.course, self.semester)
    }

    /// Returns the stored filter with any per-invocation overrides applied.
    pub fn filter_with(&self, course: Option<&str>, semester: Option<u8>) -> Filter {
        Filter::new(course.unwrap_or(&self.course), semester.unwrap_or(self.semester))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_app_settings_default_values() {
        let settings = AppSettings::default();
        assert_eq!(settings.course, "CSE");
        assert_eq!(settings.semester, 4);
        assert_eq!(settings.upcoming_limit, 5);
    }

    #[test]
    fn test_settings_wrapper_missing_key_uses_default() {
        let wrapper: SettingsWrapper = serde_norway::from_str("other: 1").unwrap();
        assert_eq!(wrapper.settings, AppSettings::default());
    }

    #[test]
    fn test_settings_partial_section_fills_defaults() {
        let yaml = "settings:\n  course: ECE\n";
        let wrapper: SettingsWrapper = serde_norway::from_str(yaml).unwrap();
        assert_eq!(wrapper.settings.course, "ECE");
        assert_eq!(wrapper.settings.semester, 4);
        assert_eq!(wrapper.settings.upcoming_limit, 5);
    }

    #[test]
    fn test_save_to_and_load_from() {
        let tmp = TempDir::new().unwrap();
        let settings = AppSettings {
            course: "MECH".to_string(),
            semester: 7,
            upcoming_limit: 3,
        };
        settings.save_to(tmp.path()).unwrap();
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), settings);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_filter_with_overrides() {
        let settings = AppSettings::default();
        assert_eq!(settings.filter(), Filter::new("CSE", 4));
        assert_eq!(settings.filter_with(Some("ECE"), None), Filter::new("ECE", 4));
        assert_eq!(settings.filter_with(None, Some(6)), Filter::new("CSE", 6));
    }
}
