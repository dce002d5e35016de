//! Level layout data and RON loading.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::{parse_ron, read_ron, ConfigError};
use crate::ghosts::GhostSettings;

/// Directory holding level layouts.
pub const LEVELS_DIR: &str = "assets/data/levels";

const BUILTIN_LEVEL: &str = include_str!("../../assets/data/levels/intro.ron");

fn default_depth() -> f32 {
    4.0
}

fn default_launch_force() -> f32 {
    12.0
}

fn default_true() -> bool {
    true
}

/// A solid axis-aligned block.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlatformDef {
    pub center: (f32, f32),
    pub size: (f32, f32),
}

/// A pad that launches the player along its up axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct JumpPadDef {
    /// Floor point the pad sits on
    pub position: (f32, f32),
    #[serde(default = "default_launch_force")]
    pub launch_force: f32,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// A region that kills the player on contact.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HazardDef {
    pub center: (f32, f32),
    pub size: (f32, f32),
}

/// What an exit does when the player reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum ExitMode {
    /// Load `next_level` (or rebuild this one) after `delay` seconds
    LoadNextLevel { delay: f32 },
    /// Change the ghost capacity instead (prototype levels)
    SetMaxGhosts(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ExitDef {
    pub position: (f32, f32),
    pub mode: ExitMode,
}

/// A level as read from RON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    /// Body center of the player at spawn
    pub player_start: (f32, f32),
    #[serde(default = "default_depth")]
    pub depth: f32,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    /// Floor points of checkpoint pads
    #[serde(default)]
    pub checkpoints: Vec<(f32, f32)>,
    #[serde(default)]
    pub jump_pads: Vec<JumpPadDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub exits: Vec<ExitDef>,
    /// Per-level ghost settings overriding the global config
    #[serde(default)]
    pub ghosts: Option<GhostSettings>,
    #[serde(default)]
    pub next_level: Option<String>,
}

impl LevelLayout {
    /// Load `assets/data/levels/<name>.ron`, falling back to the built-in level.
    pub fn load(name: &str) -> Self {
        let path = format!("{}/{}.ron", LEVELS_DIR, name);
        match read_ron::<Self>(&path).and_then(|layout| layout.validated()) {
            Ok(layout) => {
                info!("Loaded level '{}' from {}", layout.name, path);
                layout
            }
            Err(e) => {
                warn!("{}. Using built-in level.", e);
                Self::builtin()
            }
        }
    }

    /// The level compiled into the binary.
    pub fn builtin() -> Self {
        match parse_ron::<Self>("built-in level", BUILTIN_LEVEL).and_then(|layout| layout.validated()) {
            Ok(layout) => layout,
            Err(e) => {
                error!("{}. Using a bare floor.", e);
                Self::bare()
            }
        }
    }

    /// A single floor and nothing else.
    pub fn bare() -> Self {
        Self {
            name: "bare".to_string(),
            player_start: (0.0, 1.5),
            depth: default_depth(),
            platforms: vec![PlatformDef {
                center: (0.0, -0.5),
                size: (40.0, 1.0),
            }],
            checkpoints: Vec::new(),
            jump_pads: Vec::new(),
            hazards: Vec::new(),
            exits: Vec::new(),
            ghosts: None,
            next_level: None,
        }
    }

    /// Reject layouts with degenerate geometry.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.depth <= 0.0 {
            return Err(self.bad_entry("depth".to_string(), format!("must be positive, got {}", self.depth)));
        }

        let blocks = self
            .platforms
            .iter()
            .map(|p| p.size)
            .enumerate()
            .map(|(i, size)| (format!("platforms[{}]", i), size))
            .chain(
                self.hazards
                    .iter()
                    .enumerate()
                    .map(|(i, h)| (format!("hazards[{}]", i), h.size)),
            );
        for (entry, (w, h)) in blocks {
            if w <= 0.0 || h <= 0.0 {
                return Err(self.bad_entry(entry, format!("has non-positive size ({}, {})", w, h)));
            }
        }

        if let Some(ghosts) = &self.ghosts {
            if !ghosts.infinite_ghosts && ghosts.max_ghosts == 0 {
                return Err(self.bad_entry(
                    "ghosts.max_ghosts".to_string(),
                    "must be at least 1 unless infinite_ghosts is set".to_string(),
                ));
            }
        }

        Ok(self)
    }

    fn bad_entry(&self, entry: String, details: String) -> ConfigError {
        ConfigError::BadLevelEntry {
            level: self.name.clone(),
            entry,
            details,
        }
    }

    pub fn player_start_transform(&self) -> Transform {
        Transform::from_xyz(self.player_start.0, self.player_start.1, 0.0)
    }
}
