//! Configuration access port trait.

use crate::domain::error::TrackerError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get_string(section, key)
            .unwrap_or_else(|| default.to_string())
    }

    fn require_string(&self, section: &str, key: &str) -> Result<String, TrackerError> {
        self.get_string(section, key)
            .ok_or_else(|| TrackerError::ConfigMissing {
                section: section.into(),
                key: key.into(),
            })
    }

    /// Integer that must be at least 1 and fit in a `u32`.
    fn get_positive_int(&self, section: &str, key: &str, default: u32) -> Result<u32, TrackerError> {
        let value = self.get_int(section, key, i64::from(default));
        u32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| TrackerError::ConfigInvalid {
                section: section.into(),
                key: key.into(),
                reason: format!("{value} must be a positive integer"),
            })
    }
}
