//! Session statistics.

use bevy::prelude::*;

use super::events::{GhostCreatedEvent, PlayerDiedEvent};

/// Tracks ghost creations and player deaths for the current session.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameStats {
    pub ghosts_created: u32,
    pub deaths: u32,
}

impl GameStats {
    pub fn register_ghost(&mut self) {
        self.ghosts_created += 1;
    }

    pub fn register_death(&mut self) {
        self.deaths += 1;
    }
}

/// Count ghost creations and deaths from their events.
pub fn tally_stats(
    mut stats: ResMut<GameStats>,
    mut ghost_events: EventReader<GhostCreatedEvent>,
    mut death_events: EventReader<PlayerDiedEvent>,
) {
    for _ in ghost_events.read() {
        stats.register_ghost();
    }
    for _ in death_events.read() {
        stats.register_death();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let mut stats = GameStats::default();
        stats.register_ghost();
        stats.register_ghost();
        stats.register_death();
        assert_eq!(stats.ghosts_created, 2);
        assert_eq!(stats.deaths, 1);
    }
}
