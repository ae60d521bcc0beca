//! Time system for the Mocha engine
//!
//! Turns the raw frame delta reported by the windowing layer into the
//! clamped, scaled delta time that systems read each frame.

use serde::{Deserialize, Serialize};

/// Errors produced when validating a [`TimeConfig`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeConfigError {
    #[error("time scale must be finite and non-negative, got {0}")]
    InvalidTimeScale(f32),

    #[error("fixed timestep must be positive, got {0}")]
    InvalidFixedTimestep(f32),

    #[error("maximum delta time must be positive, got {0}")]
    InvalidMaxDelta(f32),
}

/// Configuration for game time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for physics (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

impl TimeConfig {
    /// Check that every field is usable by [`GameTime`]
    pub fn validate(&self) -> Result<(), TimeConfigError> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(TimeConfigError::InvalidTimeScale(self.time_scale));
        }
        if self.fixed_timestep.is_nan() || self.fixed_timestep <= 0.0 {
            return Err(TimeConfigError::InvalidFixedTimestep(self.fixed_timestep));
        }
        if self.max_delta_time.is_nan() || self.max_delta_time <= 0.0 {
            return Err(TimeConfigError::InvalidMaxDelta(self.max_delta_time));
        }
        Ok(())
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since game start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether the game is paused
    pub paused: bool,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.max(0.0).min(self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// Get the interpolation factor for rendering between fixed steps
    pub fn fixed_interpolation(&self) -> f32 {
        self.fixed_accumulator / self.config.fixed_timestep
    }

    /// Pause the game
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the game
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);

        time.pause();
        time.update(0.016);
        assert_eq!(time.delta_time, 0.0);
        assert_eq!(time.frame_count, 2);
    }

    #[test]
    fn test_delta_is_clamped_and_scaled() {
        let mut time = GameTime::default();
        time.set_time_scale(2.0);
        time.update(1.0);
        assert_eq!(time.unscaled_delta_time, 0.25);
        assert_eq!(time.delta_time, 0.5);

        time.update(-1.0);
        assert_eq!(time.delta_time, 0.0);
    }

    #[test]
    fn test_fixed_steps() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.1,
            ..Default::default()
        });
        time.update(0.25);
        assert_eq!(time.fixed_steps(), 2);
        assert!((time.fixed_interpolation() - 0.5).abs() < 1e-4);
        assert_eq!(time.fixed_steps(), 0);
    }

    #[test]
    fn test_config_validation() {
        assert!(TimeConfig::default().validate().is_ok());

        let bad = TimeConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(TimeConfigError::InvalidFixedTimestep(0.0)));

        let bad = TimeConfig {
            time_scale: -1.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(TimeConfigError::InvalidTimeScale(_))));
    }

    #[test]
    fn test_config_from_toml() {
        let config: TimeConfig = toml::from_str("time_scale = 0.5").unwrap();
        assert_eq!(config.time_scale, 0.5);
        assert_eq!(config.max_delta_time, 0.25);
    }
}
