//! Time-loop configuration loaded from an external RON file.
//!
//! All tuning values (movement, reset timing, ghost limits, collision masks)
//! are read once at startup and treated as constants afterwards.

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::ConfigError;
use crate::ghosts::GhostSettings;
use crate::player::MovementConfig;

/// Default location of the time-loop config.
pub const CONFIG_PATH: &str = "assets/data/time_loop.ron";

fn default_level() -> String {
    "intro".to_string()
}

/// Top-level configuration for the simulation core.
#[derive(Resource, Debug, Clone, Deserialize)]
pub struct TimeLoopConfig {
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub ghosts: GhostSettings,
    /// Level loaded at startup (file stem under `assets/data/levels/`)
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for TimeLoopConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            ghosts: GhostSettings::default(),
            level: default_level(),
        }
    }
}

impl TimeLoopConfig {
    /// Load from [`CONFIG_PATH`], falling back to defaults on any error.
    pub fn load() -> Self {
        match Self::try_load(CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded time-loop config from {}", CONFIG_PATH);
                config
            }
            Err(ConfigError::Missing { path }) => {
                warn!("Could not find {}. Using defaults.", path);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load and validate a config file.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = read_ron(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_ron(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = parse_ron("<inline>", contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let movement = &self.movement;
        if movement.gravity >= 0.0 {
            return Err(ConfigError::Invalid {
                field: "movement.gravity",
                details: format!("must be negative, got {}", movement.gravity),
            });
        }
        if movement.jump_height < 0.0 {
            return Err(ConfigError::Invalid {
                field: "movement.jump_height",
                details: format!("must not be negative, got {}", movement.jump_height),
            });
        }
        if movement.reset_delay < 0.0 {
            return Err(ConfigError::Invalid {
                field: "movement.reset_delay",
                details: format!("must not be negative, got {}", movement.reset_delay),
            });
        }
        if movement.body_height <= 2.0 * movement.body_radius {
            return Err(ConfigError::Invalid {
                field: "movement.body_height",
                details: format!(
                    "must exceed twice the body radius ({}), got {}",
                    2.0 * movement.body_radius,
                    movement.body_height
                ),
            });
        }
        if !self.ghosts.infinite_ghosts && self.ghosts.max_ghosts == 0 {
            return Err(ConfigError::Invalid {
                field: "ghosts.max_ghosts",
                details: "must be at least 1 unless infinite_ghosts is set".to_string(),
            });
        }
        if movement.ground_mask & self.ghosts.membership() == 0 {
            return Err(ConfigError::Invalid {
                field: "movement.ground_mask",
                details: format!(
                    "must include the ghost layer ({:#x}), got {:#x}",
                    self.ghosts.membership(),
                    movement.ground_mask
                ),
            });
        }
        Ok(())
    }

    /// Ghost settings for a level, falling back to the global ones.
    ///
    /// A level whose ghost layer the player cannot stand on keeps its
    /// capacity but is moved to the global ghost layer.
    pub fn ghost_settings_for(&self, level: Option<&GhostSettings>) -> GhostSettings {
        let Some(level) = level else {
            return self.ghosts.clone();
        };

        let mut settings = level.clone();
        if self.movement.ground_mask & settings.membership() == 0 {
            warn!(
                "Ghost layer {:#x} is outside the ground mask {:#x}, using {:#x}",
                settings.ghost_layer, self.movement.ground_mask, self.ghosts.ghost_layer
            );
            settings.ghost_layer = self.ghosts.ghost_layer;
        }
        settings
    }
}

/// Read and deserialize a RON file.
pub fn read_ron<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ConfigError::Missing { path: display });
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;

    parse_ron(&display, &contents)
}

/// Deserialize RON text, tagging errors with the source name.
pub fn parse_ron<T: DeserializeOwned>(source: &str, contents: &str) -> Result<T, ConfigError> {
    ron::from_str(contents).map_err(|e| ConfigError::Syntax {
        path: source.to_string(),
        line: e.position.line,
        column: e.position.col,
        message: e.code.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_parses() {
        let config = TimeLoopConfig::from_ron(include_str!("../../assets/data/time_loop.ron"))
            .expect("shipped config should be valid");
        assert_eq!(config.level, "intro");
        assert!(config.movement.gravity < 0.0);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = TimeLoopConfig::from_ron("(level: \"sandbox\")").unwrap();
        assert_eq!(config.level, "sandbox");
        assert_eq!(config.movement.move_speed, MovementConfig::default().move_speed);
        assert_eq!(config.ghosts.max_ghosts, GhostSettings::default().max_ghosts);
    }

    #[test]
    fn partial_movement_section_keeps_other_defaults() {
        let config = TimeLoopConfig::from_ron("(movement: (move_speed: 3.0))").unwrap();
        assert_eq!(config.movement.move_speed, 3.0);
        assert_eq!(config.movement.coyote_time, MovementConfig::default().coyote_time);
    }

    #[test]
    fn positive_gravity_is_rejected() {
        let err = TimeLoopConfig::from_ron("(movement: (gravity: 9.8))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "movement.gravity", .. }));
    }

    #[test]
    fn zero_capacity_is_rejected_unless_infinite() {
        assert!(TimeLoopConfig::from_ron("(ghosts: (max_ghosts: 0))").is_err());
        assert!(TimeLoopConfig::from_ron("(ghosts: (max_ghosts: 0, infinite_ghosts: true))").is_ok());
    }

    #[test]
    fn malformed_text_reports_parse_error() {
        let err = TimeLoopConfig::from_ron("(movement: ").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 1, .. }));
    }

    #[test]
    fn missing_file_reports_not_found() {
        let err = TimeLoopConfig::try_load("assets/data/does_not_exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }

    #[test]
    fn ground_mask_must_cover_ghost_layer() {
        let err = TimeLoopConfig::from_ron("(movement: (ground_mask: 1))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "movement.ground_mask", .. }));
    }

    #[test]
    fn level_ghost_settings_keep_a_standable_layer() {
        let config = TimeLoopConfig::default();
        assert_eq!(config.ghost_settings_for(None), config.ghosts);

        let level = GhostSettings {
            max_ghosts: 3,
            ghost_layer: 1 << 12,
            ..default()
        };
        let settings = config.ghost_settings_for(Some(&level));
        assert_eq!(settings.max_ghosts, 3);
        assert_eq!(settings.ghost_layer, config.ghosts.ghost_layer);

        let standable = GhostSettings {
            max_ghosts: 2,
            ..default()
        };
        assert_eq!(config.ghost_settings_for(Some(&standable)), standable);
    }
}
