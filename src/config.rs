//! Engine configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! size = 5
//! history_capacity = 10
//! reset_win_on_restart = false
//! ```

use std::path::Path;

use crate::error::ConfigError;

/// Tunable engine parameters. `Default` gives the classic 4x4 game.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Side length of the square grid.
    #[serde(default = "defaults::size")]
    pub size: usize,
    /// Number of undo snapshots kept. 0 disables undo.
    #[serde(default = "defaults::history_capacity")]
    pub history_capacity: usize,
    /// Merge value that wins the game.
    #[serde(default = "defaults::win_value")]
    pub win_value: u64,
    /// Probability that a spawned tile is a 4 rather than a 2.
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,
    /// Whether `restart` re-arms the win state for the next game.
    #[serde(default = "defaults::reset_win_on_restart")]
    pub reset_win_on_restart: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            history_capacity: defaults::history_capacity(),
            win_value: defaults::win_value(),
            four_probability: defaults::four_probability(),
            reset_win_on_restart: defaults::reset_win_on_restart(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 2 {
            return Err(ConfigError::GridTooSmall(self.size));
        }
        if self.win_value < 4 || !self.win_value.is_power_of_two() {
            return Err(ConfigError::InvalidWinValue(self.win_value));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(ConfigError::InvalidFourProbability(self.four_probability));
        }
        Ok(())
    }
}

impl std::str::FromStr for EngineConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

mod defaults {
    pub fn size() -> usize { 4 }
    pub fn history_capacity() -> usize { 5 }
    pub fn win_value() -> u64 { 2048 }
    pub fn four_probability() -> f64 { 0.1 }
    pub fn reset_win_on_restart() -> bool { true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_classic_game() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.size, 4);
        assert_eq!(cfg.history_capacity, 5);
        assert_eq!(cfg.win_value, 2048);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: EngineConfig = "size = 6\nwin_value = 4096".parse().unwrap();
        assert_eq!(cfg.size, 6);
        assert_eq!(cfg.win_value, 4096);
        assert_eq!(cfg.history_capacity, 5);
        assert!(cfg.reset_win_on_restart);
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg: EngineConfig = "".parse().unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let small = EngineConfig { size: 1, ..Default::default() };
        assert!(matches!(small.validate(), Err(ConfigError::GridTooSmall(1))));
        let odd_win = EngineConfig { win_value: 1000, ..Default::default() };
        assert!(matches!(odd_win.validate(), Err(ConfigError::InvalidWinValue(1000))));
        let prob = EngineConfig { four_probability: 1.5, ..Default::default() };
        assert!(matches!(prob.validate(), Err(ConfigError::InvalidFourProbability(_))));
        let nan = EngineConfig { four_probability: f64::NAN, ..Default::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = "size = \"big\"".parse::<EngineConfig>().unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::from_toml("/nonexistent/puzzle-2048.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
