//! Microcycle cloning configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::cloning::CloneDefaults;

/// Defaults used when a new week is built.
#[derive(Debug, Clone, Deserialize)]
pub struct CloningConfig {
    /// Sets synthesized for a copied exercise that has none
    #[serde(default = "default_set_count")]
    pub default_set_count: u32,

    #[serde(default = "default_reps")]
    pub default_reps: String,

    #[serde(default = "default_expected_rir")]
    pub default_expected_rir: String,

    /// Appended to the name of a deload week
    #[serde(default = "default_deload_suffix")]
    pub deload_suffix: String,

    #[serde(default = "default_day_name_prefix")]
    pub day_name_prefix: String,

    #[serde(default = "default_week_name_prefix")]
    pub week_name_prefix: String,

    /// Look up copied exercises in the catalog and report the ones that
    /// no longer resolve
    #[serde(default = "default_true")]
    pub verify_catalog_on_clone: bool,
}

impl CloningConfig {
    pub fn clone_defaults(&self) -> CloneDefaults {
        CloneDefaults {
            set_count: self.default_set_count,
            reps: self.default_reps.clone(),
            expected_rir: self.default_expected_rir.clone(),
            deload_suffix: self.deload_suffix.clone(),
            day_name_prefix: self.day_name_prefix.clone(),
            week_name_prefix: self.week_name_prefix.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_set_count == 0 {
            return Err(ValidationError::InvalidDefaultSetCount);
        }
        if self.default_reps.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CLONING__DEFAULT_REPS"));
        }
        Ok(())
    }
}

impl Default for CloningConfig {
    fn default() -> Self {
        Self {
            default_set_count: default_set_count(),
            default_reps: default_reps(),
            default_expected_rir: default_expected_rir(),
            deload_suffix: default_deload_suffix(),
            day_name_prefix: default_day_name_prefix(),
            week_name_prefix: default_week_name_prefix(),
            verify_catalog_on_clone: true,
        }
    }
}

fn default_set_count() -> u32 {
    3
}

fn default_reps() -> String {
    "8-12".to_string()
}

fn default_expected_rir() -> String {
    "2".to_string()
}

fn default_deload_suffix() -> String {
    "(Descarga)".to_string()
}

fn default_day_name_prefix() -> String {
    "Día".to_string()
}

fn default_week_name_prefix() -> String {
    "Semana".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_domain_defaults() {
        assert_eq!(CloningConfig::default().clone_defaults(), CloneDefaults::default());
    }

    #[test]
    fn zero_set_count_is_invalid() {
        let config = CloningConfig {
            default_set_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidDefaultSetCount));
    }
}
