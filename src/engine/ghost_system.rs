use tracing::debug;

use crate::types::{Direction, GhostMode, GhostName, GhostView, Position, RuntimeEvent};

use super::utils::{ghost_options, toward, wander};
use super::GameSession;

#[derive(Clone, Debug)]
pub struct Ghost {
    pub name: GhostName,
    pub pos: Position,
    pub home: Position,
    pub dir: Direction,
    pub mode: GhostMode,
    /// Advances only while roaming (Chase/Scatter) and drives the Scatter windows.
    pub scatter_clock: u32,
}

impl Ghost {
    pub fn new(name: GhostName, home: Position) -> Self {
        Self {
            name,
            pos: home,
            home,
            dir: Direction::Up,
            mode: GhostMode::Chase,
            scatter_clock: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = self.home;
        self.dir = Direction::Up;
        self.mode = GhostMode::Chase;
        self.scatter_clock = 0;
    }

    pub fn frighten(&mut self) {
        if self.mode != GhostMode::Eaten {
            self.mode = GhostMode::Frightened;
        }
    }

    pub fn calm(&mut self) {
        if self.mode == GhostMode::Frightened {
            self.mode = GhostMode::Chase;
        }
    }

    pub fn view(&self, flashing: bool) -> GhostView {
        GhostView {
            name: self.name,
            x: self.pos.x,
            y: self.pos.y,
            dir: self.dir,
            mode: self.mode,
            flashing: flashing && self.mode == GhostMode::Frightened,
        }
    }
}

impl GameSession {
    pub(super) fn update_ghosts(&mut self) {
        for idx in 0..self.ghosts.len() {
            self.update_ghost(idx);
        }
    }

    fn update_ghost(&mut self, idx: usize) {
        match self.ghosts[idx].mode {
            GhostMode::Eaten => {
                if self.revive_if_home(idx) {
                    return;
                }
                let home = self.ghosts[idx].home;
                self.move_ghost_toward(idx, home);
                self.revive_if_home(idx);
            }
            GhostMode::Frightened => self.move_ghost_randomly(idx),
            GhostMode::Chase | GhostMode::Scatter => {
                let cycle = self.config.scatter_cycle_ticks;
                let window = self.config.scatter_window_ticks;
                let ghost = &mut self.ghosts[idx];
                ghost.scatter_clock = ghost.scatter_clock.wrapping_add(1);
                ghost.mode = if ghost.scatter_clock % cycle < window {
                    GhostMode::Scatter
                } else {
                    GhostMode::Chase
                };

                if ghost.mode == GhostMode::Scatter {
                    self.move_ghost_randomly(idx);
                } else {
                    let target = self.player.pos;
                    self.move_ghost_toward(idx, target);
                }
            }
        }
    }

    fn revive_if_home(&mut self, idx: usize) -> bool {
        let ghost = &mut self.ghosts[idx];
        if ghost.pos != ghost.home {
            return false;
        }
        ghost.mode = GhostMode::Chase;
        debug!(ghost = ?ghost.name, "ghost back home");
        self.events.push(RuntimeEvent::GhostHome { ghost: ghost.name });
        true
    }

    fn move_ghost_toward(&mut self, idx: usize, target: Position) {
        let ghost = &self.ghosts[idx];
        let options = ghost_options(&self.maze, ghost.pos, ghost.dir);
        let choice = toward(&self.maze, ghost.pos, &options, target);
        if let Some(dir) = choice {
            self.advance_ghost(idx, dir);
        }
    }

    fn move_ghost_randomly(&mut self, idx: usize) {
        let ghost = &self.ghosts[idx];
        let options = ghost_options(&self.maze, ghost.pos, ghost.dir);
        let current = ghost.dir;
        let keep_chance = self.config.scatter_keep_direction_chance;
        let choice = wander(&mut self.rng, &options, current, keep_chance);
        if let Some(dir) = choice {
            self.advance_ghost(idx, dir);
        }
    }

    fn advance_ghost(&mut self, idx: usize, dir: Direction) {
        let next = self.maze.next_position(self.ghosts[idx].pos, dir);
        let ghost = &mut self.ghosts[idx];
        ghost.pos = next;
        ghost.dir = dir;
    }

    pub(super) fn frighten_ghosts(&mut self) {
        for ghost in &mut self.ghosts {
            ghost.frighten();
        }
    }

    pub(super) fn calm_ghosts(&mut self) {
        for ghost in &mut self.ghosts {
            ghost.calm();
        }
    }

    pub(super) fn reset_ghosts(&mut self) {
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GameConfig;
    use crate::engine::GameSession;
    use crate::types::{Direction, GhostMode, Position, RuntimeEvent};

    const TUNNEL: &[&str] = &["##########", "T.P.GGGG.T", "##########"];

    fn chase_only() -> GameConfig {
        GameConfig {
            scatter_window_ticks: 0,
            ..GameConfig::default()
        }
    }

    fn session(rows: &[&str], config: GameConfig) -> GameSession {
        GameSession::with_rows(config, rows).expect("test maze is valid")
    }

    #[test]
    fn ghost_wraps_through_tunnel() {
        let mut game = session(TUNNEL, chase_only());
        game.player.pos = Position::new(8, 1);
        game.ghosts[0].pos = Position::new(0, 1);
        game.ghosts[0].dir = Direction::Left;

        game.update_ghosts();
        assert_eq!(game.ghosts[0].pos, Position::new(9, 1));
        assert_eq!(game.ghosts[0].dir, Direction::Left);
    }

    #[test]
    fn scatter_window_opens_the_cycle_then_chase_follows() {
        let config = GameConfig {
            scatter_cycle_ticks: 10,
            scatter_window_ticks: 3,
            ..GameConfig::default()
        };
        let mut game = session(TUNNEL, config);

        game.update_ghosts();
        assert!(game.ghosts.iter().all(|g| g.mode == GhostMode::Scatter));
        assert!(game.ghosts.iter().all(|g| g.scatter_clock == 1));

        game.update_ghosts();
        game.update_ghosts();
        assert!(game.ghosts.iter().all(|g| g.mode == GhostMode::Chase));

        for _ in 0..7 {
            game.update_ghosts();
        }
        assert!(game.ghosts.iter().all(|g| g.scatter_clock == 10));
        assert!(game.ghosts.iter().all(|g| g.mode == GhostMode::Scatter));
    }

    #[test]
    fn eaten_ghost_heads_home_and_resumes_chase() {
        let mut game = session(TUNNEL, chase_only());
        let home = game.ghosts[3].home;
        game.ghosts[3].pos = Position::new(home.x + 1, home.y);
        game.ghosts[3].dir = Direction::Left;
        game.ghosts[3].mode = GhostMode::Eaten;

        game.update_ghosts();
        assert_eq!(game.ghosts[3].pos, home);
        assert_eq!(game.ghosts[3].mode, GhostMode::Chase);
        assert!(game
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::GhostHome { .. })));
    }

    #[test]
    fn eaten_ghosts_ignore_frighten_and_calm() {
        let mut game = session(TUNNEL, chase_only());
        game.ghosts[1].mode = GhostMode::Eaten;
        game.frighten_ghosts();
        assert_eq!(game.ghosts[0].mode, GhostMode::Frightened);
        assert_eq!(game.ghosts[1].mode, GhostMode::Eaten);

        game.calm_ghosts();
        assert_eq!(game.ghosts[0].mode, GhostMode::Chase);
        assert_eq!(game.ghosts[1].mode, GhostMode::Eaten);
    }

    #[test]
    fn frightened_ghosts_do_not_advance_scatter_clock() {
        let mut game = session(TUNNEL, chase_only());
        game.frighten_ghosts();
        game.update_ghosts();
        assert!(game.ghosts.iter().all(|g| g.scatter_clock == 0));
        assert!(game.ghosts.iter().all(|g| g.mode == GhostMode::Frightened));
    }

    #[test]
    fn reset_returns_ghost_to_home_facing_up() {
        let mut game = session(TUNNEL, chase_only());
        game.ghosts[2].pos = Position::new(1, 1);
        game.ghosts[2].dir = Direction::Left;
        game.ghosts[2].mode = GhostMode::Frightened;
        game.ghosts[2].scatter_clock = 42;

        game.reset_ghosts();
        let ghost = &game.ghosts[2];
        assert_eq!(ghost.pos, ghost.home);
        assert_eq!(ghost.dir, Direction::Up);
        assert_eq!(ghost.mode, GhostMode::Chase);
        assert_eq!(ghost.scatter_clock, 0);
    }
}
