use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    step_interval_ms, BASE_STEP_INTERVAL_MS, DEFAULT_STARTING_LIVES, MIN_STEP_INTERVAL_MS,
    POWER_DURATION_TICKS, POWER_WARNING_TICKS, RESPAWN_DELAY_MS, SCATTER_CYCLE_TICKS,
    SCATTER_KEEP_DIRECTION_CHANCE, SCATTER_WINDOW_TICKS, STEP_INTERVAL_DECREMENT_MS,
};
use crate::error::ConfigError;

/// Tunables for one game session. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub starting_lives: u32,
    pub power_duration_ticks: u32,
    pub power_warning_ticks: u32,
    pub scatter_cycle_ticks: u32,
    pub scatter_window_ticks: u32,
    pub scatter_keep_direction_chance: f64,
    pub base_step_interval_ms: u64,
    pub min_step_interval_ms: u64,
    pub step_interval_decrement_ms: u64,
    pub respawn_delay_ms: u64,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_lives: DEFAULT_STARTING_LIVES,
            power_duration_ticks: POWER_DURATION_TICKS,
            power_warning_ticks: POWER_WARNING_TICKS,
            scatter_cycle_ticks: SCATTER_CYCLE_TICKS,
            scatter_window_ticks: SCATTER_WINDOW_TICKS,
            scatter_keep_direction_chance: SCATTER_KEEP_DIRECTION_CHANCE,
            base_step_interval_ms: BASE_STEP_INTERVAL_MS,
            min_step_interval_ms: MIN_STEP_INTERVAL_MS,
            step_interval_decrement_ms: STEP_INTERVAL_DECREMENT_MS,
            respawn_delay_ms: RESPAWN_DELAY_MS,
            seed: 0,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(invalid("startingLives", "must be at least 1"));
        }
        if self.power_duration_ticks == 0 {
            return Err(invalid("powerDurationTicks", "must be at least 1"));
        }
        if self.power_warning_ticks >= self.power_duration_ticks {
            return Err(invalid(
                "powerWarningTicks",
                format!(
                    "{} must be below powerDurationTicks {}",
                    self.power_warning_ticks, self.power_duration_ticks
                ),
            ));
        }
        if self.scatter_cycle_ticks == 0 {
            return Err(invalid("scatterCycleTicks", "must be at least 1"));
        }
        if self.scatter_window_ticks > self.scatter_cycle_ticks {
            return Err(invalid(
                "scatterWindowTicks",
                format!(
                    "{} exceeds scatterCycleTicks {}",
                    self.scatter_window_ticks, self.scatter_cycle_ticks
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.scatter_keep_direction_chance) {
            return Err(invalid(
                "scatterKeepDirectionChance",
                format!("{} is outside [0, 1]", self.scatter_keep_direction_chance),
            ));
        }
        if self.min_step_interval_ms > self.base_step_interval_ms {
            return Err(invalid(
                "minStepIntervalMs",
                format!(
                    "{} exceeds baseStepIntervalMs {}",
                    self.min_step_interval_ms, self.base_step_interval_ms
                ),
            ));
        }
        Ok(())
    }

    pub fn step_interval_for_level(&self, level: u32) -> u64 {
        step_interval_ms(
            level,
            self.base_step_interval_ms,
            self.min_step_interval_ms,
            self.step_interval_decrement_ms,
        )
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
