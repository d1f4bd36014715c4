//! Decoder and statistics configuration (`melee-stats.toml`).
//!
//! Every field has a default matching the device firmware, so an empty file
//! (or no file at all) yields [`Config::default`].
//!
//! ```toml
//! player_count = 2
//! combo_string_timeout = 45
//! frames_landed_recovery = 45
//! stick_deadzone = 0.2875
//! trigger_threshold = 0.3
//! frames_per_second = 60
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParserError, Result};
use crate::format::DEFAULT_PLAYER_COUNT;
use crate::geometry::STICK_DEADZONE;

/// Tunables for decoding and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of player blocks in Start and Update messages.
    pub player_count: usize,
    /// Frames without the opponent in hitstun before a combo string ends.
    pub combo_string_timeout: u32,
    /// Frames a player must stay in control on stage to finish a recovery.
    pub frames_landed_recovery: u32,
    /// Stick magnitude below which an axis counts as neutral.
    pub stick_deadzone: f64,
    /// Analog trigger level that counts as a press.
    pub trigger_threshold: f64,
    /// Game frame rate, used for APM.
    pub frames_per_second: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            player_count: DEFAULT_PLAYER_COUNT,
            combo_string_timeout: 45,
            frames_landed_recovery: 45,
            stick_deadzone: STICK_DEADZONE,
            trigger_threshold: 0.3,
            frames_per_second: 60,
        }
    }
}

impl Config {
    /// Parses a TOML document and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::Config` if the document is malformed or a value
    /// is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use melee_stats::Config;
    ///
    /// let config = Config::from_toml_str("combo_string_timeout = 30").unwrap();
    /// assert_eq!(config.combo_string_timeout, 30);
    /// assert_eq!(config.player_count, 2);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| ParserError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::IoError` if the file cannot be read, or
    /// `ParserError::Config` if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.player_count == 0 {
            return Err(invalid("player_count must be at least 1"));
        }
        if self.frames_per_second == 0 {
            return Err(invalid("frames_per_second must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.stick_deadzone) {
            return Err(invalid("stick_deadzone must be in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.trigger_threshold) {
            return Err(invalid("trigger_threshold must be in [0, 1]"));
        }
        Ok(())
    }

    /// Whether statistics can be computed for this player count.
    #[must_use]
    pub fn stats_enabled(&self) -> bool {
        self.player_count == 2
    }
}

fn invalid(reason: &str) -> ParserError {
    ParserError::Config {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // =============================================================
    // Default value tests
    // =============================================================

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.player_count, 2);
        assert_eq!(config.combo_string_timeout, 45);
        assert_eq!(config.frames_landed_recovery, 45);
        assert!((config.stick_deadzone - 0.2875).abs() < f64::EPSILON);
        assert!((config.trigger_threshold - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.frames_per_second, 60);
        assert!(config.stats_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    // =============================================================
    // TOML parsing tests
    // =============================================================

    #[test]
    fn test_partial_document() {
        let config = Config::from_toml_str("player_count = 4\ntrigger_threshold = 0.5").unwrap();
        assert_eq!(config.player_count, 4);
        assert!((config.trigger_threshold - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.combo_string_timeout, 45);
        assert!(!config.stats_enabled());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Config::from_toml_str("server_enabled = true").unwrap_err();
        assert!(matches!(err, ParserError::Config { .. }));
    }

    #[test]
    fn test_malformed_document_rejected() {
        assert!(Config::from_toml_str("player_count = ").is_err());
        assert!(Config::from_toml_str("player_count = \"two\"").is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        for doc in [
            "player_count = 0",
            "frames_per_second = 0",
            "stick_deadzone = 1.5",
            "trigger_threshold = -0.1",
        ] {
            let err = Config::from_toml_str(doc).unwrap_err();
            assert!(err.to_string().contains("Invalid configuration"), "{doc}");
        }
    }

    // =============================================================
    // File loading tests
    // =============================================================

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "combo_string_timeout = 60").unwrap();
        writeln!(file, "frames_landed_recovery = 30").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.combo_string_timeout, 60);
        assert_eq!(config.frames_landed_recovery, 30);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ParserError::IoError(_)));
    }
}
