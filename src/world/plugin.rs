//! World plugin - level loading, level resets, and interactables.

use bevy::prelude::*;

use super::builder::{build_level, LevelEntity};
use super::interactables::{apply_exits, apply_hazards, apply_jump_pads, PendingLevelLoad};
use super::layout::LevelLayout;
use super::triggers::{detect_trigger_entries, TriggerEntered};
use crate::checkpoints::{CheckpointMaterials, CheckpointRegistry};
use crate::core::{GameState, LevelReloadEvent, LoopSet, ReloadReason, TimeLoopConfig};
use crate::ghosts::{CommandsGhostSpawner, GhostPool};
use crate::player::{spawn_follow_camera, PlayerInput};

/// Name of the level currently built.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentLevel {
    pub name: String,
    pub next_level: Option<String>,
}

/// Request to (re)build a level by name.
#[derive(Event, Debug, Clone)]
pub struct LoadLevelRequest {
    pub name: String,
    /// Reported in the `LevelReloadEvent` once the level is built
    pub reason: ReloadReason,
}

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentLevel>()
            .init_resource::<PendingLevelLoad>()
            .add_event::<TriggerEntered>()
            .add_event::<LoadLevelRequest>()
            .add_systems(Startup, (spawn_camera, request_initial_level))
            // The rebuilt player and checkpoints must exist before the
            // simulation and the highlight sync look for them
            .add_systems(
                Update,
                (
                    handle_full_reset
                        .run_if(in_state(GameState::InGame).or(in_state(GameState::GameOver))),
                    load_requested_level,
                )
                    .chain()
                    .before(LoopSet::Simulate)
                    .before(LoopSet::Presentation),
            )
            .add_systems(Update, detect_trigger_entries.in_set(LoopSet::Detect))
            .add_systems(
                Update,
                (apply_jump_pads, apply_hazards, apply_exits).in_set(LoopSet::Triggers),
            )
            .add_systems(Update, tick_pending_level_load.run_if(in_state(GameState::InGame)));
    }
}

fn spawn_camera(mut commands: Commands) {
    spawn_follow_camera(&mut commands, Vec3::ZERO);
}

fn request_initial_level(config: Res<TimeLoopConfig>, mut requests: EventWriter<LoadLevelRequest>) {
    requests.send(LoadLevelRequest {
        name: config.level.clone(),
        reason: ReloadReason::Loaded,
    });
}

/// Tear down the current level and build the requested one.
#[allow(clippy::too_many_arguments)]
fn load_requested_level(
    mut commands: Commands,
    mut requests: EventReader<LoadLevelRequest>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<TimeLoopConfig>,
    checkpoint_materials: Res<CheckpointMaterials>,
    mut pool: ResMut<GhostPool>,
    mut registry: ResMut<CheckpointRegistry>,
    mut current: ResMut<CurrentLevel>,
    mut pending: ResMut<PendingLevelLoad>,
    level_entities: Query<Entity, With<LevelEntity>>,
    mut reloads: EventWriter<LevelReloadEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    // Only the latest request matters
    let Some(request) = requests.read().last().cloned() else {
        return;
    };

    for entity in level_entities.iter() {
        commands.entity(entity).despawn_recursive();
    }

    let layout = LevelLayout::load(&request.name);
    let settings = config.ghost_settings_for(layout.ghosts.as_ref());
    pool.apply_settings(settings, &mut CommandsGhostSpawner::new(&mut commands));

    let built = build_level(
        &mut commands,
        &mut meshes,
        &mut materials,
        &layout,
        &config.movement,
        &checkpoint_materials,
    );

    pool.set_reference_body(config.movement.body().reference());
    *registry = CheckpointRegistry::with_start_point(built.start);

    *current = CurrentLevel {
        name: request.name,
        next_level: layout.next_level.clone(),
    };

    pending.timer = None;

    reloads.send(LevelReloadEvent {
        reason: request.reason,
    });
    next_state.set(GameState::InGame);
}

/// Rebuild the current level from scratch.
///
/// The rebuild clears every ghost, restores the level's ghost settings, and
/// reseeds the checkpoint registry with only the start point.
fn handle_full_reset(
    input: Res<PlayerInput>,
    current: Res<CurrentLevel>,
    mut requests: EventWriter<LoadLevelRequest>,
) {
    if !input.full_reset_pressed {
        return;
    }

    info!("Level reset, rebuilding '{}'", current.name);
    requests.send(LoadLevelRequest {
        name: current.name.clone(),
        reason: ReloadReason::FullReset,
    });
}

/// Fire the level load an exit scheduled once its delay runs out.
fn tick_pending_level_load(
    time: Res<Time>,
    mut pending: ResMut<PendingLevelLoad>,
    current: Res<CurrentLevel>,
    mut requests: EventWriter<LoadLevelRequest>,
) {
    let Some(timer) = pending.timer.as_mut() else {
        return;
    };

    if timer.tick(time.delta()).finished() {
        pending.timer = None;
        let name = current.next_level.clone().unwrap_or_else(|| current.name.clone());
        requests.send(LoadLevelRequest {
            name,
            reason: ReloadReason::Loaded,
        });
    }
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::checkpoints::{Checkpoint, CheckpointPlugin, RespawnPoint};
    use crate::core::{CorePlugin, GameStats};
    use crate::ghosts::{Ghost, GhostPlugin};
    use crate::player::{MovementState, Player};
    use crate::world::TriggerVolume;

    /// The world, ghost and checkpoint plugins over a headless app.
    fn create_test_app() -> App {
        let mut app = App::new();

        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.insert_resource(TimeLoopConfig::default());
        app.insert_resource(Assets::<Mesh>::default());
        app.insert_resource(Assets::<StandardMaterial>::default());
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<PlayerInput>();
        app.add_plugins((CorePlugin, GhostPlugin, CheckpointPlugin, WorldPlugin));

        app
    }

    /// Run until the first level is built and the game is in play.
    fn start_level(app: &mut App) {
        app.update();
        app.update();
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
    }

    fn press_full_reset(app: &mut App) {
        app.world_mut().resource_mut::<PlayerInput>().full_reset_pressed = true;
        app.update();
        app.world_mut().resource_mut::<PlayerInput>().full_reset_pressed = false;
    }

    fn player_entity(app: &mut App) -> Entity {
        let mut players = app.world_mut().query_filtered::<Entity, With<Player>>();
        players.single(app.world())
    }

    fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
        let mut query = app.world_mut().query_filtered::<(), F>();
        query.iter(app.world()).count()
    }

    /// Leave a ghost the way the player tick does, through the pool.
    fn leave_ghost(app: &mut App) {
        let world = app.world_mut();
        world.resource_scope(|world, mut pool: Mut<GhostPool>| {
            let mut commands = world.commands();
            let snapshot = MovementState::default().capture(&Transform::default());
            pool.create_ghost(Vec3::X, Quat::IDENTITY, snapshot, &mut CommandsGhostSpawner::new(&mut commands));
        });
        world.flush();
    }

    fn reload_reasons(app: &App) -> Vec<ReloadReason> {
        app.world()
            .resource::<Events<LevelReloadEvent>>()
            .iter_current_update_events()
            .map(|event| event.reason)
            .collect()
    }

    #[test]
    fn level_load_uses_level_ghost_settings() {
        let mut app = create_test_app();
        start_level(&mut app);

        assert_eq!(app.world().resource::<CurrentLevel>().name, "intro");
        assert_eq!(app.world().resource::<GhostPool>().settings().max_ghosts, 3);
        assert_eq!(app.world().resource::<CheckpointRegistry>().len(), 1);
        assert_eq!(count::<With<Player>>(&mut app), 1);
    }

    #[test]
    fn start_marker_is_highlighted_on_load() {
        let mut app = create_test_app();
        app.update();

        let highlight = app.world().resource::<CheckpointMaterials>().highlight.clone();
        let mut markers = app
            .world_mut()
            .query_filtered::<&MeshMaterial3d<StandardMaterial>, (With<Checkpoint>, Without<TriggerVolume>)>();
        let material = markers.single(app.world());
        assert_eq!(material.0, highlight);
    }

    #[test]
    fn full_reset_rebuilds_the_level_from_scratch() {
        let mut app = create_test_app();
        start_level(&mut app);
        let old_player = player_entity(&mut app);

        // A run that reached two checkpoints, lowered the cap and left a ghost
        {
            let mut registry = app.world_mut().resource_mut::<CheckpointRegistry>();
            for (id, x) in [(9001, 9.0), (9002, 27.0)] {
                registry.register_checkpoint(RespawnPoint {
                    entity: Entity::from_raw(id),
                    transform: Transform::from_xyz(x, 1.3, 0.0),
                });
            }
        }
        app.world_mut().resource_mut::<GhostPool>().set_max_ghosts(1);
        leave_ghost(&mut app);
        assert_eq!(count::<With<Ghost>>(&mut app), 1);

        press_full_reset(&mut app);

        let registry = app.world().resource::<CheckpointRegistry>();
        assert_eq!(registry.len(), 1);
        let pool = app.world().resource::<GhostPool>();
        assert!(pool.is_empty());
        assert_eq!(pool.settings().max_ghosts, 3);
        assert_eq!(count::<With<Ghost>>(&mut app), 0);
        assert!(reload_reasons(&app).contains(&ReloadReason::FullReset));

        let new_player = player_entity(&mut app);
        assert_ne!(new_player, old_player);

        // The next respawn is the level start, not a checkpoint from the old run
        let start = app
            .world_mut()
            .resource_mut::<CheckpointRegistry>()
            .get_next_respawn_point()
            .unwrap();
        assert_eq!(start.translation, Vec3::new(0.0, 1.1, 0.0));
    }

    #[test]
    fn lava_ends_the_run_and_full_reset_retries() {
        let mut app = create_test_app();
        start_level(&mut app);

        let player = player_entity(&mut app);
        app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(22.0, 0.0, 0.0);
        app.update();
        app.update();

        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::GameOver);
        assert_eq!(app.world().resource::<GameStats>().deaths, 1);

        press_full_reset(&mut app);
        app.update();

        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
        assert_eq!(count::<With<Player>>(&mut app), 1);
        let player = player_entity(&mut app);
        assert_eq!(
            app.world().get::<Transform>(player).unwrap().translation,
            Vec3::new(0.0, 1.1, 0.0)
        );
    }

    #[test]
    fn jump_pad_launches_player_on_entry() {
        let mut app = create_test_app();
        start_level(&mut app);

        let player = player_entity(&mut app);
        app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(18.0, 1.1, 0.0);
        app.update();

        let movement = app.world().get::<MovementState>(player).unwrap();
        assert!((movement.velocity.y - 16.0).abs() < 1e-4);
    }
}
