//! Session settings
//!
//! Fixed for the lifetime of a session. Loaded from JSON or from the
//! `<ball_speed> <frame_rate>` command line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Environment variable naming a JSON settings file
pub const SETTINGS_ENV: &str = "BREAKOUT_SETTINGS";

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ball speed in logical pixels per second
    pub ball_speed: u32,
    /// Simulation ticks per second
    pub frame_rate: u32,
    /// Period of the row-descent driver in milliseconds
    pub row_descent_ms: u64,
    /// Seed for random launch intents
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_speed: DEFAULT_BALL_SPEED,
            frame_rate: DEFAULT_FRAME_RATE,
            row_descent_ms: DEFAULT_ROW_DESCENT_MS,
            seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Create settings with the given ball speed and frame rate
    pub fn new(ball_speed: u32, frame_rate: u32) -> Self {
        Self {
            ball_speed,
            frame_rate,
            ..Self::default()
        }
    }

    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load from `BREAKOUT_SETTINGS` if set, otherwise defaults
    pub fn from_env() -> Result<Self, SettingsError> {
        match std::env::var(SETTINGS_ENV) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Apply positional `<ball_speed> <frame_rate>` arguments over `self`
    ///
    /// Missing arguments keep the current values.
    pub fn with_args<I, S>(mut self, args: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        if let Some(speed) = args.next() {
            self.ball_speed = parse_arg("ball_speed", speed.as_ref())?;
        }
        if let Some(rate) = args.next() {
            self.frame_rate = parse_arg("frame_rate", rate.as_ref())?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.frame_rate == 0 {
            return Err(SettingsError::Invalid("frame_rate must be positive".into()));
        }
        if self.ball_speed == 0 {
            return Err(SettingsError::Invalid("ball_speed must be positive".into()));
        }
        if self.row_descent_ms == 0 {
            return Err(SettingsError::Invalid(
                "row_descent_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Ball travel per tick, truncated toward zero
    pub fn ball_step(&self) -> i32 {
        (self.pixels_per_frame() as i32).max(0)
    }

    /// Paddle travel per tick, truncated toward zero
    pub fn paddle_step(&self) -> i32 {
        ((self.pixels_per_frame() * PADDLE_SPEED_FACTOR) as i32).max(0)
    }

    /// Tick driver period in milliseconds
    pub fn tick_period_ms(&self) -> u64 {
        (1000 / self.frame_rate.max(1)).max(1) as u64
    }

    fn pixels_per_frame(&self) -> f32 {
        self.ball_speed as f32 / self.frame_rate.max(1) as f32
    }
}

fn parse_arg(name: &str, value: &str) -> Result<u32, SettingsError> {
    value.trim().parse().map_err(|_| {
        SettingsError::Parse(format!(
            "{name}: expected a positive integer, got {value:?}"
        ))
    })
}
