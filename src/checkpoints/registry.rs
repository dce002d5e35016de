//! Round-robin registry of respawn points.
//!
//! New checkpoints are inserted at the front and the cursor jumps back to 0,
//! so the most recently reached checkpoint is always the next respawn. Each
//! query then advances the cursor, cycling through every point reached so far.

use bevy::prelude::*;
use thiserror::Error;

/// Errors reported by the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckpointError {
    /// Queried before any respawn point exists.
    #[error("no checkpoints available")]
    Empty,
}

/// A registered respawn location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnPoint {
    /// Checkpoint (or start marker) entity, used as identity
    pub entity: Entity,
    /// Pose the player is teleported to
    pub transform: Transform,
}

/// Ordered respawn points with a rotating cursor.
#[derive(Resource, Debug, Default)]
pub struct CheckpointRegistry {
    points: Vec<RespawnPoint>,
    current_index: usize,
    highlighted: Option<Entity>,
}

impl CheckpointRegistry {
    /// Registry whose permanent first entry is the level start.
    pub fn with_start_point(start: RespawnPoint) -> Self {
        let mut registry = Self {
            points: vec![start],
            current_index: 0,
            highlighted: None,
        };
        registry.highlight(0);
        registry
    }

    /// Register a newly reached checkpoint as the next respawn.
    ///
    /// Returns `false` if the checkpoint was already registered.
    pub fn register_checkpoint(&mut self, point: RespawnPoint) -> bool {
        if self.contains(point.entity) {
            return false;
        }

        self.points.insert(0, point);
        self.current_index = 0;
        self.highlight(self.current_index);
        true
    }

    /// Return the point under the cursor and advance the cursor.
    pub fn get_next_respawn_point(&mut self) -> Result<Transform, CheckpointError> {
        if self.points.is_empty() {
            return Err(CheckpointError::Empty);
        }

        let respawn = self.points[self.current_index].transform;
        self.current_index = (self.current_index + 1) % self.points.len();
        self.highlight(self.current_index);

        Ok(respawn)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.points.iter().any(|p| p.entity == entity)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The single checkpoint currently marked as next up.
    pub fn highlighted(&self) -> Option<Entity> {
        self.highlighted
    }

    fn highlight(&mut self, index: usize) {
        self.highlighted = self.points.get(index).map(|p| p.entity);
    }
}
