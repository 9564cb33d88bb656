use fieldwalk_common::{Direction, GridBounds, SignObservation, TimeOfDay, WorldPosition};

use crate::config::{ConfigError, WorldConfig};
use crate::memory::{ExplorationMemory, SignMemory};
use crate::visibility::{self, VisibilityClass};

/// The single player of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub position: WorldPosition,
}

/// A display toggle owned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionFlag {
    /// Unlocks the corridor and full-sign overlays.
    GodMode,
    Corridors,
    Signs,
    /// Draw terrain at full color regardless of visibility.
    AllTerrain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionFlags {
    pub god_mode: bool,
    pub show_corridors: bool,
    pub show_signs: bool,
    pub show_all_terrain: bool,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self {
            god_mode: false,
            show_corridors: true,
            show_signs: true,
            show_all_terrain: false,
        }
    }
}

impl SessionFlags {
    pub fn get(&self, flag: SessionFlag) -> bool {
        match flag {
            SessionFlag::GodMode => self.god_mode,
            SessionFlag::Corridors => self.show_corridors,
            SessionFlag::Signs => self.show_signs,
            SessionFlag::AllTerrain => self.show_all_terrain,
        }
    }

    fn slot(&mut self, flag: SessionFlag) -> &mut bool {
        match flag {
            SessionFlag::GodMode => &mut self.god_mode,
            SessionFlag::Corridors => &mut self.show_corridors,
            SessionFlag::Signs => &mut self.show_signs,
            SessionFlag::AllTerrain => &mut self.show_all_terrain,
        }
    }

    pub fn corridor_overlay(&self) -> bool {
        self.god_mode && self.show_corridors
    }

    pub fn sign_overlay(&self) -> bool {
        self.god_mode && self.show_signs
    }
}

/// Result of a movement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved {
        from: WorldPosition,
        to: WorldPosition,
        newly_revealed: usize,
    },
    /// Target was outside the world; nothing changed.
    Rejected { target: WorldPosition },
}

/// Errors from starting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid world configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Exploration state for one session.
///
/// Owns the player, the exploration memory and the sign memory. Player
/// position changes only through [`Session::try_move`]; memories only grow.
#[derive(Debug, Clone)]
pub struct Session {
    config: WorldConfig,
    player: PlayerState,
    memory: ExplorationMemory,
    signs: SignMemory,
    flags: SessionFlags,
    time_of_day: TimeOfDay,
}

impl Session {
    /// Start at the configured spawn, with the spawn neighbourhood revealed.
    pub fn start(config: WorldConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let spawn = config.spawn();
        let mut memory = ExplorationMemory::new();
        memory.reveal(spawn, config.visibility_radius, config.bounds());
        tracing::info!(
            %spawn,
            cols = config.grid_cols,
            rows = config.grid_rows,
            radius = config.visibility_radius,
            "session started"
        );
        Ok(Self {
            time_of_day: config.time_of_day.unwrap_or_default(),
            player: PlayerState { position: spawn },
            memory,
            signs: SignMemory::new(),
            flags: SessionFlags::default(),
            config,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn bounds(&self) -> GridBounds {
        self.config.bounds()
    }

    pub fn visibility_radius(&self) -> u32 {
        self.config.visibility_radius
    }

    pub fn player(&self) -> PlayerState {
        self.player
    }

    pub fn position(&self) -> WorldPosition {
        self.player.position
    }

    pub fn memory(&self) -> &ExplorationMemory {
        &self.memory
    }

    pub fn signs(&self) -> &SignMemory {
        &self.signs
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    /// Step one cell. Out-of-bounds targets leave the session untouched.
    pub fn try_move(&mut self, direction: Direction) -> MoveOutcome {
        let from = self.player.position;
        let to = from.offset(direction.delta());
        if !self.bounds().contains(to) {
            tracing::debug!(%from, %to, "move rejected: out of bounds");
            return MoveOutcome::Rejected { target: to };
        }
        self.player.position = to;
        let newly_revealed = self
            .memory
            .reveal(to, self.config.visibility_radius, self.bounds());
        tracing::debug!(%from, %to, newly_revealed, "player moved");
        MoveOutcome::Moved {
            from,
            to,
            newly_revealed,
        }
    }

    pub fn classify(&self, cell: WorldPosition) -> VisibilityClass {
        visibility::classify(
            cell,
            self.player.position,
            self.config.visibility_radius,
            &self.memory,
        )
    }

    pub fn is_visible(&self, cell: WorldPosition) -> bool {
        self.player
            .position
            .within_radius(cell, self.config.visibility_radius)
    }

    /// Flip a flag and return its new value.
    pub fn toggle(&mut self, flag: SessionFlag) -> bool {
        let slot = self.flags.slot(flag);
        *slot = !*slot;
        let value = *slot;
        tracing::debug!(?flag, value, "flag toggled");
        value
    }

    pub fn set_flag(&mut self, flag: SessionFlag, value: bool) {
        *self.flags.slot(flag) = value;
    }

    /// Returns true if the value changed.
    pub fn set_time_of_day(&mut self, time: TimeOfDay) -> bool {
        let changed = self.time_of_day != time;
        self.time_of_day = time;
        changed
    }

    /// Remember signs from an applied observation batch.
    pub fn remember_signs(&mut self, sightings: &[SignObservation]) -> usize {
        self.signs.record(sightings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn start_reveals_spawn_neighbourhood() {
        let session = Session::start(test_config(100, 100, (50, 50), 3)).unwrap();
        assert_eq!(session.position(), WorldPosition::new(50, 50));
        assert!(session.memory().contains(WorldPosition::new(53, 50)));
        assert!(!session.memory().contains(WorldPosition::new(54, 50)));
        assert_eq!(session.time_of_day(), TimeOfDay::Midday);
    }

    #[test]
    fn start_rejects_invalid_config() {
        let err = Session::start(test_config(10, 10, (-1, 0), 3)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Config(ConfigError::SpawnOutOfBounds { .. })
        ));
    }

    #[test]
    fn out_of_bounds_moves_leave_state_unchanged() {
        let cases = [
            ((0, 5), Direction::West),
            ((9, 5), Direction::East),
            ((5, 0), Direction::North),
            ((5, 9), Direction::South),
            ((0, 0), Direction::NorthWest),
        ];
        for (spawn, direction) in cases {
            let mut session = Session::start(test_config(10, 10, spawn, 2)).unwrap();
            let before = session.memory().len();
            let outcome = session.try_move(direction);
            assert!(matches!(outcome, MoveOutcome::Rejected { .. }));
            assert_eq!(session.position(), WorldPosition::new(spawn.0, spawn.1));
            assert_eq!(session.memory().len(), before);
        }
    }

    #[test]
    fn walking_right_from_spawn() {
        let mut session = Session::start(test_config(100, 100, (50, 50), 25)).unwrap();
        for _ in 0..5 {
            assert!(matches!(
                session.try_move(Direction::East),
                MoveOutcome::Moved { .. }
            ));
        }
        let here = WorldPosition::new(55, 50);
        assert_eq!(session.position(), here);

        let spawn = WorldPosition::new(50, 50);
        for x in 20..=85 {
            for y in 20..=80 {
                let cell = WorldPosition::new(x, y);
                let class = session.classify(cell);
                if here.within_radius(cell, 25) {
                    assert_eq!(class, VisibilityClass::Visible, "{cell}");
                } else if spawn.within_radius(cell, 25) {
                    assert_eq!(class, VisibilityClass::Revealed, "{cell}");
                }
            }
        }
        // Left edge of the spawn disk: 25 from spawn, 30 from here.
        assert_eq!(
            session.classify(WorldPosition::new(25, 50)),
            VisibilityClass::Revealed
        );
        assert_eq!(
            session.classify(WorldPosition::new(24, 50)),
            VisibilityClass::Unknown
        );
    }

    #[test]
    fn toggles_flip_and_report() {
        let mut session = Session::start(test_config(10, 10, (5, 5), 2)).unwrap();
        assert!(!session.flags().corridor_overlay());
        assert!(session.toggle(SessionFlag::GodMode));
        assert!(session.flags().corridor_overlay());
        assert!(!session.toggle(SessionFlag::Corridors));
        assert!(!session.flags().corridor_overlay());
        assert!(session.flags().sign_overlay());
        session.set_flag(SessionFlag::AllTerrain, true);
        assert!(session.flags().get(SessionFlag::AllTerrain));
    }

    #[test]
    fn time_of_day_reports_change() {
        let mut session = Session::start(test_config(10, 10, (5, 5), 2)).unwrap();
        assert!(session.set_time_of_day(TimeOfDay::Night));
        assert!(!session.set_time_of_day(TimeOfDay::Night));
    }
}
