pub mod env;
pub use env::apply_env_overrides;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Complete colortrail configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrailConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Round progression and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Playback speed at level 1 (milliseconds)
    #[serde(default = "default_base_speed")]
    pub base_speed_ms: u64,
    /// Speed reduction per completed level (milliseconds)
    #[serde(default = "default_speed_step")]
    pub speed_step_ms: u64,
    /// Floor for the playback speed (milliseconds)
    #[serde(default = "default_min_speed")]
    pub min_speed_ms: u64,
    /// Score bonus for each completed round
    #[serde(default = "default_points_per_level")]
    pub points_per_level: u32,
}

fn default_base_speed() -> u64 {
    1000
}

fn default_speed_step() -> u64 {
    50
}

fn default_min_speed() -> u64 {
    100
}

fn default_points_per_level() -> u32 {
    10
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_speed_ms: default_base_speed(),
            speed_step_ms: default_speed_step(),
            min_speed_ms: default_min_speed(),
            points_per_level: default_points_per_level(),
        }
    }
}

impl GameConfig {
    pub fn base_speed(&self) -> Duration {
        Duration::from_millis(self.base_speed_ms)
    }

    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.speed_step_ms)
    }

    pub fn min_speed(&self) -> Duration {
        Duration::from_millis(self.min_speed_ms)
    }
}

/// Delays between the timed steps of a round.
///
/// Flash and gap durations scale with the current speed; everything else is a
/// fixed pause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pause between `start` and the first round
    #[serde(default = "default_start_delay")]
    pub start_delay_ms: u64,
    /// Pause between announcing a sequence and revealing its first color
    #[serde(default = "default_pre_playback_delay")]
    pub pre_playback_delay_ms: u64,
    /// Share of the speed each color stays lit
    #[serde(default = "default_flash_ratio")]
    pub flash_ratio: f64,
    /// Share of the speed between two lit colors
    #[serde(default = "default_gap_ratio")]
    pub gap_ratio: f64,
    /// Pause between the last reveal and opening the input window
    #[serde(default = "default_post_playback_delay")]
    pub post_playback_delay_ms: u64,
    /// Pause between a completed round and the next one
    #[serde(default = "default_next_round_delay")]
    pub next_round_delay_ms: u64,
    /// Pause between a wrong color and the game over screen
    #[serde(default = "default_game_over_delay")]
    pub game_over_delay_ms: u64,
}

fn default_start_delay() -> u64 {
    500
}

fn default_pre_playback_delay() -> u64 {
    800
}

fn default_flash_ratio() -> f64 {
    0.4
}

fn default_gap_ratio() -> f64 {
    0.3
}

fn default_post_playback_delay() -> u64 {
    500
}

fn default_next_round_delay() -> u64 {
    1500
}

fn default_game_over_delay() -> u64 {
    1000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: default_start_delay(),
            pre_playback_delay_ms: default_pre_playback_delay(),
            flash_ratio: default_flash_ratio(),
            gap_ratio: default_gap_ratio(),
            post_playback_delay_ms: default_post_playback_delay(),
            next_round_delay_ms: default_next_round_delay(),
            game_over_delay_ms: default_game_over_delay(),
        }
    }
}

impl TimingConfig {
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn pre_playback_delay(&self) -> Duration {
        Duration::from_millis(self.pre_playback_delay_ms)
    }

    pub fn post_playback_delay(&self) -> Duration {
        Duration::from_millis(self.post_playback_delay_ms)
    }

    pub fn next_round_delay(&self) -> Duration {
        Duration::from_millis(self.next_round_delay_ms)
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }

    /// How long one color stays lit at `speed`
    pub fn flash_for(&self, speed: Duration) -> Duration {
        scale_millis(speed, self.flash_ratio)
    }

    /// Dark time after a lit color at `speed`
    pub fn gap_for(&self, speed: Duration) -> Duration {
        scale_millis(speed, self.gap_ratio)
    }
}

// Whole milliseconds keep the reveal schedule free of float drift
fn scale_millis(speed: Duration, ratio: f64) -> Duration {
    Duration::from_millis((speed.as_millis() as f64 * ratio).round() as u64)
}

/// HTTP/WebSocket server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Live sessions allowed at once; new connections are refused beyond it
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroMinSpeed,
    BaseBelowMin { base_ms: u64, min_ms: u64 },
    ZeroPointsPerLevel,
    InvalidRatio { field: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroMinSpeed => write!(f, "game.min_speed_ms must be positive"),
            ConfigError::BaseBelowMin { base_ms, min_ms } => write!(
                f,
                "game.base_speed_ms ({}) must not be below game.min_speed_ms ({})",
                base_ms, min_ms
            ),
            ConfigError::ZeroPointsPerLevel => {
                write!(f, "game.points_per_level must be positive")
            }
            ConfigError::InvalidRatio { field, value } => {
                write!(f, "timing.{} must be a finite non-negative number, got {}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl TrailConfig {
    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.game;
        if game.min_speed_ms == 0 {
            return Err(ConfigError::ZeroMinSpeed);
        }
        if game.base_speed_ms < game.min_speed_ms {
            return Err(ConfigError::BaseBelowMin {
                base_ms: game.base_speed_ms,
                min_ms: game.min_speed_ms,
            });
        }
        if game.points_per_level == 0 {
            return Err(ConfigError::ZeroPointsPerLevel);
        }
        for (field, value) in [
            ("flash_ratio", self.timing.flash_ratio),
            ("gap_ratio", self.timing.gap_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRatio { field, value });
            }
        }
        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<TrailConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path))?;
    let config: TrailConfig =
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TrailConfig::default();
        assert_eq!(config.game.base_speed_ms, 1000);
        assert_eq!(config.game.speed_step_ms, 50);
        assert_eq!(config.game.min_speed_ms, 100);
        assert_eq!(config.game.points_per_level, 10);
        assert_eq!(config.timing.next_round_delay_ms, 1500);
        assert_eq!(config.server.bind_addr, "0.0.0.0:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialization() {
        let toml = r#"
            [game]
            base_speed_ms = 800
            speed_step_ms = 25
            min_speed_ms = 200
            points_per_level = 5

            [timing]
            start_delay_ms = 100
            flash_ratio = 0.5

            [server]
            bind_addr = "127.0.0.1:4000"
            max_sessions = 8
        "#;

        let config: TrailConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.game.base_speed_ms, 800);
        assert_eq!(config.game.points_per_level, 5);
        assert_eq!(config.timing.start_delay_ms, 100);
        assert_eq!(config.timing.flash_ratio, 0.5);
        assert_eq!(config.timing.gap_ratio, 0.3); // Default
        assert_eq!(config.server.max_sessions, 8);
    }

    #[test]
    fn test_partial_config() {
        // Missing sections use defaults
        let toml = r#"
            [server]
            max_sessions = 3
        "#;

        let config: TrailConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.max_sessions, 3);
        assert_eq!(config.game, GameConfig::default());
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn test_flash_and_gap_scale_with_speed() {
        let timing = TimingConfig::default();
        let speed = Duration::from_millis(1000);
        assert_eq!(timing.flash_for(speed), Duration::from_millis(400));
        assert_eq!(timing.gap_for(speed), Duration::from_millis(300));
    }

    #[test]
    fn test_validate_rejects_base_below_min() {
        let mut config = TrailConfig::default();
        config.game.base_speed_ms = 50;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BaseBelowMin { base_ms: 50, min_ms: 100 })
        );
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = TrailConfig::default();
        config.game.min_speed_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroMinSpeed));

        let mut config = TrailConfig::default();
        config.game.points_per_level = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPointsPerLevel));

        let mut config = TrailConfig::default();
        config.timing.gap_ratio = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRatio { field: "gap_ratio", .. })
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\npoints_per_level = 20").unwrap();

        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.game.points_per_level, 20);
        assert_eq!(config.game.base_speed_ms, 1000);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nbase_speed_ms = 10\nmin_speed_ms = 100").unwrap();

        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("must not be below"));
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("/nonexistent/colortrail.toml").is_err());
    }
}
