//! Bounded pool of frozen ghost actors.
//!
//! The pool owns the ordered list of live ghosts (oldest first). Unless
//! `infinite_ghosts` is set, inserting at capacity first destroys the oldest
//! ghost, so the live count never exceeds `max_ghosts` once an insertion
//! completes.

use std::collections::VecDeque;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use serde::Deserialize;

use super::snapshot::{GhostStateKind, KinematicSnapshot};

/// Default ghost layer bitmask (layer 8).
pub const DEFAULT_GHOST_LAYER: u32 = 1 << 8;

/// Ghost limits and layer assignment, per game or per level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GhostSettings {
    /// Maximum live ghosts when not infinite
    pub max_ghosts: usize,
    /// Disable the capacity bound entirely
    pub infinite_ghosts: bool,
    /// Layer bitmask ghosts are assigned to
    pub ghost_layer: u32,
    /// Opacity of the ghost material
    pub ghost_alpha: f32,
}

impl GhostSettings {
    /// The single collision group bit ghosts are members of.
    pub fn membership(&self) -> u32 {
        1 << layer_index(self.ghost_layer)
    }
}

impl Default for GhostSettings {
    fn default() -> Self {
        Self {
            max_ghosts: 10,
            infinite_ghosts: false,
            ghost_layer: DEFAULT_GHOST_LAYER,
            ghost_alpha: 0.5,
        }
    }
}

/// Capsule the ghost collision volume is sized from (the player's body).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceBody {
    pub radius: f32,
    pub height: f32,
    pub center: Vec3,
}

/// Box collision volume of a ghost, relative to the ghost's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostVolume {
    /// Full size of the box
    pub size: Vec3,
    /// Offset of the box center from the ghost origin
    pub center: Vec3,
}

impl GhostVolume {
    /// Size the volume from the reference body; crouching halves height and center.
    ///
    /// Without a reference body the volume is a unit box at the origin.
    pub fn for_state(reference: Option<&ReferenceBody>, state: GhostStateKind) -> Self {
        let mut volume = match reference {
            Some(body) => Self {
                size: Vec3::new(body.radius * 2.0, body.height, body.radius * 2.0),
                center: body.center,
            },
            None => Self {
                size: Vec3::ONE,
                center: Vec3::ZERO,
            },
        };

        if state == GhostStateKind::Crouching {
            volume.size.y *= 0.5;
            volume.center.y *= 0.5;
        }

        volume
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }
}

/// Index of the layer a bitmask refers to (nearest power of two).
pub fn layer_index(mask: u32) -> u32 {
    if mask == 0 {
        return 0;
    }
    ((mask as f32).log2().round() as u32).min(31)
}

/// Collision groups for ghosts: a single dedicated membership, solid to everything.
pub fn ghost_collision_groups(settings: &GhostSettings) -> CollisionGroups {
    CollisionGroups::new(Group::from_bits_truncate(settings.membership()), Group::ALL)
}

/// Visual template every ghost is instantiated from.
#[derive(Debug, Clone, Default)]
pub struct GhostTemplate {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Everything needed to instantiate one ghost.
#[derive(Debug)]
pub struct GhostBlueprint {
    pub position: Vec3,
    pub rotation: Quat,
    pub snapshot: KinematicSnapshot,
    pub volume: GhostVolume,
    pub groups: CollisionGroups,
    pub template: GhostTemplate,
}

/// Actor instantiation surface used by the pool.
pub trait GhostSpawner {
    /// Fully build a ghost actor and return its handle.
    fn spawn_ghost(&mut self, blueprint: &GhostBlueprint) -> Entity;

    /// Destroy a ghost actor and all of its parts.
    fn despawn_ghost(&mut self, ghost: Entity);
}

/// Whether a ghost creation is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationStatus {
    #[default]
    Idle,
    InProgress,
}

/// Pool bookkeeping for one live ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveGhost {
    pub entity: Entity,
    pub state: GhostStateKind,
}

/// The bounded collection of live ghosts.
#[derive(Resource, Debug, Default)]
pub struct GhostPool {
    settings: GhostSettings,
    template: Option<GhostTemplate>,
    reference: Option<ReferenceBody>,
    ghosts: VecDeque<LiveGhost>,
    status: CreationStatus,
}

impl GhostPool {
    pub fn new(settings: GhostSettings) -> Self {
        Self {
            settings,
            ..default()
        }
    }

    pub fn set_template(&mut self, template: GhostTemplate) {
        self.template = Some(template);
    }

    pub fn set_reference_body(&mut self, reference: ReferenceBody) {
        self.reference = Some(reference);
    }

    pub fn settings(&self) -> &GhostSettings {
        &self.settings
    }

    /// Replace the ghost settings (on level load) and clear every live ghost.
    pub fn apply_settings(&mut self, settings: GhostSettings, spawner: &mut impl GhostSpawner) {
        self.settings = settings;
        self.clear_all_ghosts(spawner);
    }

    /// Change the capacity at runtime.
    ///
    /// Ghosts above the new capacity stay alive until the next insertion
    /// evicts them.
    pub fn set_max_ghosts(&mut self, max_ghosts: usize) {
        self.settings.max_ghosts = max_ghosts.max(1);
    }

    pub fn len(&self) -> usize {
        self.ghosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ghosts.is_empty()
    }

    /// Live ghosts, oldest first.
    pub fn ghosts(&self) -> impl Iterator<Item = &LiveGhost> {
        self.ghosts.iter()
    }

    pub fn is_creating(&self) -> bool {
        self.status == CreationStatus::InProgress
    }

    /// Turn a snapshot into a ghost at the given pose.
    ///
    /// Returns `None` without side effects when a creation is already in
    /// progress, and `None` with a warning when no template is configured.
    pub fn create_ghost(
        &mut self,
        position: Vec3,
        rotation: Quat,
        snapshot: KinematicSnapshot,
        spawner: &mut impl GhostSpawner,
    ) -> Option<Entity> {
        if self.status == CreationStatus::InProgress {
            return None;
        }

        self.status = CreationStatus::InProgress;
        let created = self.instantiate(position, rotation, snapshot, spawner);
        self.status = CreationStatus::Idle;

        created
    }

    fn instantiate(
        &mut self,
        position: Vec3,
        rotation: Quat,
        snapshot: KinematicSnapshot,
        spawner: &mut impl GhostSpawner,
    ) -> Option<Entity> {
        let Some(template) = self.template.clone() else {
            warn!("No ghost template configured, skipping ghost creation");
            return None;
        };

        if !self.settings.infinite_ghosts {
            while self.ghosts.len() >= self.settings.max_ghosts.max(1) {
                let Some(oldest) = self.ghosts.pop_front() else {
                    break;
                };
                debug!("Evicting oldest ghost {:?} ({})", oldest.entity, oldest.state.label());
                spawner.despawn_ghost(oldest.entity);
            }
        }

        let state = snapshot.state;
        let blueprint = GhostBlueprint {
            position,
            rotation,
            volume: GhostVolume::for_state(self.reference.as_ref(), state),
            groups: ghost_collision_groups(&self.settings),
            template,
            snapshot,
        };

        let entity = spawner.spawn_ghost(&blueprint);
        self.ghosts.push_back(LiveGhost { entity, state });

        Some(entity)
    }

    /// Destroy every live ghost. Safe to call repeatedly.
    pub fn clear_all_ghosts(&mut self, spawner: &mut impl GhostSpawner) {
        for ghost in self.ghosts.drain(..) {
            spawner.despawn_ghost(ghost.entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records spawns and despawns instead of touching a world.
    #[derive(Default)]
    struct RecordingSpawner {
        next_id: u32,
        spawned: Vec<(Entity, GhostVolume, CollisionGroups)>,
        despawned: Vec<Entity>,
    }

    impl GhostSpawner for RecordingSpawner {
        fn spawn_ghost(&mut self, blueprint: &GhostBlueprint) -> Entity {
            self.next_id += 1;
            let entity = Entity::from_raw(self.next_id);
            self.spawned.push((entity, blueprint.volume, blueprint.groups));
            entity
        }

        fn despawn_ghost(&mut self, ghost: Entity) {
            self.despawned.push(ghost);
        }
    }

    fn snapshot(state: GhostStateKind) -> KinematicSnapshot {
        KinematicSnapshot {
            state,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            grounded: true,
            horizontal_input: 0.0,
        }
    }

    fn pool_with_capacity(max_ghosts: usize) -> GhostPool {
        let mut pool = GhostPool::new(GhostSettings {
            max_ghosts,
            ..default()
        });
        pool.set_template(GhostTemplate::default());
        pool
    }

    fn create(pool: &mut GhostPool, spawner: &mut RecordingSpawner) -> Option<Entity> {
        pool.create_ghost(Vec3::ZERO, Quat::IDENTITY, snapshot(GhostStateKind::Standing), spawner)
    }

    #[test]
    fn third_ghost_evicts_the_first() {
        let mut pool = pool_with_capacity(2);
        let mut spawner = RecordingSpawner::default();

        let a = create(&mut pool, &mut spawner).unwrap();
        let b = create(&mut pool, &mut spawner).unwrap();
        let c = create(&mut pool, &mut spawner).unwrap();

        let live: Vec<Entity> = pool.ghosts().map(|g| g.entity).collect();
        assert_eq!(live, vec![b, c]);
        assert_eq!(spawner.despawned, vec![a]);
    }

    #[test]
    fn count_never_exceeds_capacity() {
        let capacity = 4;
        let mut pool = pool_with_capacity(capacity);
        let mut spawner = RecordingSpawner::default();
        let mut created = Vec::new();

        for _ in 0..11 {
            created.push(create(&mut pool, &mut spawner).unwrap());
            assert!(pool.len() <= capacity);
        }

        // Oldest survivor is the (capacity - 1)th before the newest
        let oldest = pool.ghosts().next().unwrap().entity;
        assert_eq!(oldest, created[created.len() - capacity]);
    }

    #[test]
    fn infinite_mode_never_evicts() {
        let mut pool = pool_with_capacity(2);
        pool.apply_settings(
            GhostSettings {
                max_ghosts: 2,
                infinite_ghosts: true,
                ..default()
            },
            &mut RecordingSpawner::default(),
        );
        let mut spawner = RecordingSpawner::default();

        for _ in 0..5 {
            create(&mut pool, &mut spawner);
        }

        assert_eq!(pool.len(), 5);
        assert!(spawner.despawned.is_empty());
    }

    #[test]
    fn missing_template_creates_nothing() {
        let mut pool = GhostPool::new(GhostSettings::default());
        let mut spawner = RecordingSpawner::default();

        assert_eq!(create(&mut pool, &mut spawner), None);
        assert!(pool.is_empty());
        assert!(spawner.spawned.is_empty());
    }

    #[test]
    fn reentrant_creation_is_silently_dropped() {
        let mut pool = pool_with_capacity(1);
        let mut spawner = RecordingSpawner::default();
        create(&mut pool, &mut spawner);

        pool.status = CreationStatus::InProgress;
        assert_eq!(create(&mut pool, &mut spawner), None);

        // Nothing evicted, nothing spawned, status untouched
        assert_eq!(pool.len(), 1);
        assert_eq!(spawner.spawned.len(), 1);
        assert!(spawner.despawned.is_empty());
        assert!(pool.is_creating());
    }

    #[test]
    fn status_returns_to_idle_after_creation() {
        let mut pool = GhostPool::new(GhostSettings::default());
        let mut spawner = RecordingSpawner::default();

        // Both the early-out and the success path release the guard
        create(&mut pool, &mut spawner);
        assert!(!pool.is_creating());

        pool.set_template(GhostTemplate::default());
        create(&mut pool, &mut spawner);
        assert!(!pool.is_creating());
    }

    #[test]
    fn clear_all_twice_is_harmless() {
        let mut pool = pool_with_capacity(3);
        let mut spawner = RecordingSpawner::default();
        create(&mut pool, &mut spawner);
        create(&mut pool, &mut spawner);

        pool.clear_all_ghosts(&mut spawner);
        assert_eq!(pool.len(), 0);
        pool.clear_all_ghosts(&mut spawner);
        assert_eq!(pool.len(), 0);
        assert_eq!(spawner.despawned.len(), 2);
    }

    #[test]
    fn lowering_capacity_evicts_down_on_next_insert() {
        let mut pool = pool_with_capacity(5);
        let mut spawner = RecordingSpawner::default();
        for _ in 0..5 {
            create(&mut pool, &mut spawner);
        }

        pool.set_max_ghosts(2);
        assert_eq!(pool.len(), 5);

        create(&mut pool, &mut spawner);
        assert_eq!(pool.len(), 2);
        assert_eq!(spawner.despawned.len(), 4);
    }

    #[test]
    fn crouching_ghost_gets_half_height_volume() {
        let mut pool = pool_with_capacity(3);
        pool.set_reference_body(ReferenceBody {
            radius: 0.5,
            height: 2.0,
            center: Vec3::new(0.0, 0.4, 0.0),
        });
        let mut spawner = RecordingSpawner::default();

        pool.create_ghost(Vec3::ZERO, Quat::IDENTITY, snapshot(GhostStateKind::Standing), &mut spawner);
        pool.create_ghost(Vec3::ZERO, Quat::IDENTITY, snapshot(GhostStateKind::Crouching), &mut spawner);

        let standing = spawner.spawned[0].1;
        let crouching = spawner.spawned[1].1;
        assert_eq!(standing.size, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(crouching.size, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(crouching.center, Vec3::new(0.0, 0.2, 0.0));
    }

    #[test]
    fn volume_without_reference_is_unit_box() {
        let volume = GhostVolume::for_state(None, GhostStateKind::Moving);
        assert_eq!(volume.size, Vec3::ONE);
        assert_eq!(volume.center, Vec3::ZERO);
    }

    #[test]
    fn ghosts_use_the_dedicated_layer() {
        let mut pool = pool_with_capacity(1);
        let mut spawner = RecordingSpawner::default();
        create(&mut pool, &mut spawner);

        let groups = spawner.spawned[0].2;
        assert_eq!(groups.memberships, Group::GROUP_9);
        assert_eq!(groups.filters, Group::ALL);
    }

    #[test]
    fn layer_index_rounds_to_nearest_layer() {
        assert_eq!(layer_index(1), 0);
        assert_eq!(layer_index(1 << 8), 8);
        assert_eq!(layer_index(0), 0);
    }
}
