use tracing::debug;

use crate::constants::{DOT_SCORE, POWER_PELLET_SCORE};
use crate::types::{GhostMode, PelletKind, Position, RuntimeEvent};

use super::GameSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Contact {
    Clear,
    PlayerCaught,
}

impl GameSession {
    /// Consumes whatever sits under the player. Returns true when the level is cleared.
    pub(super) fn apply_player_pickup(&mut self) -> bool {
        let pos = self.player.pos;
        let Some(kind) = self.maze.consume(pos) else {
            return false;
        };

        self.dots_collected += 1;
        match kind {
            PelletKind::Dot => {
                self.add_score(DOT_SCORE);
                self.events.push(RuntimeEvent::DotEaten { x: pos.x, y: pos.y });
            }
            PelletKind::PowerPellet => {
                self.add_score(POWER_PELLET_SCORE);
                self.events.push(RuntimeEvent::PelletEaten { x: pos.x, y: pos.y });
                self.start_power_mode();
            }
        }

        debug_assert!(self.dots_collected <= self.maze.total_dots());
        self.dots_collected == self.maze.total_dots()
    }

    fn start_power_mode(&mut self) {
        let ticks = self.config.power_duration_ticks;
        self.power.start(ticks);
        self.frighten_ghosts();
        debug!(ticks, "power mode started");
        self.events.push(RuntimeEvent::PowerModeStarted { ticks });
    }

    /// Same-tile or swapped-tile contact between the player and each ghost.
    /// A non-frightened ghost ends the pass immediately.
    pub(super) fn resolve_ghost_contacts(
        &mut self,
        player_before: Position,
        ghosts_before: &[Position],
    ) -> Contact {
        let player_now = self.player.pos;
        for idx in 0..self.ghosts.len() {
            let ghost_now = self.ghosts[idx].pos;
            let overlap = ghost_now == player_now;
            let swapped = ghosts_before
                .get(idx)
                .map(|ghost_before| *ghost_before == player_now && ghost_now == player_before)
                .unwrap_or(false);
            if !overlap && !swapped {
                continue;
            }

            match self.ghosts[idx].mode {
                GhostMode::Frightened => self.eat_ghost(idx),
                GhostMode::Eaten => {}
                GhostMode::Chase | GhostMode::Scatter => return Contact::PlayerCaught,
            }
        }
        Contact::Clear
    }

    fn eat_ghost(&mut self, idx: usize) {
        let points = self.power.claim_bounty();
        self.ghosts[idx].mode = GhostMode::Eaten;
        self.ghosts_eaten_total += 1;
        self.add_score(points);
        let ghost = self.ghosts[idx].name;
        debug!(?ghost, points, "ghost eaten");
        self.events.push(RuntimeEvent::GhostEaten { ghost, points });
    }

    pub(super) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.high_score = self.high_score.max(self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::Contact;
    use crate::config::GameConfig;
    use crate::engine::GameSession;
    use crate::types::{GhostMode, Position, RuntimeEvent};

    const STRIP: &[&str] = &["#########", "#P..o...#", "#.#####.#", "#..GGGG.#", "#########"];

    fn session() -> GameSession {
        GameSession::with_rows(GameConfig::default(), STRIP).expect("strip maze is valid")
    }

    fn ghost_positions(game: &GameSession) -> Vec<Position> {
        game.ghosts.iter().map(|g| g.pos).collect()
    }

    #[test]
    fn dot_and_pellet_scores_and_power_start() {
        let mut game = session();
        game.player.pos = Position::new(2, 1);
        assert!(!game.apply_player_pickup());
        assert_eq!(game.score, 10);

        game.player.pos = Position::new(4, 1);
        assert!(!game.apply_player_pickup());
        assert_eq!(game.score, 60);
        assert_eq!(game.dots_collected, 2);
        assert!(game.power.is_active());
        assert!(game
            .ghosts
            .iter()
            .all(|ghost| ghost.mode == GhostMode::Frightened));

        assert!(!game.apply_player_pickup());
        assert_eq!(game.score, 60);
        assert_eq!(game.dots_collected, 2);
    }

    #[test]
    fn eating_four_ghosts_in_one_window_compounds_to_three_thousand() {
        let mut game = session();
        game.player.pos = Position::new(4, 1);
        game.apply_player_pickup();
        let after_pellet = game.score;

        let mut paid = Vec::new();
        for idx in 0..4 {
            game.ghosts[idx].pos = game.player.pos;
            let before = ghost_positions(&game);
            let score_before = game.score;
            let contact = game.resolve_ghost_contacts(game.player.pos, &before);
            assert_eq!(contact, Contact::Clear);
            assert_eq!(game.ghosts[idx].mode, GhostMode::Eaten);
            paid.push(game.score - score_before);
            game.ghosts[idx].pos = game.ghosts[idx].home;
        }

        assert_eq!(paid, vec![200, 400, 800, 1600]);
        assert_eq!(game.score - after_pellet, 3000);
        assert_eq!(game.ghosts_eaten_total, 4);
    }

    #[test]
    fn eaten_ghost_is_harmless_and_not_eaten_twice() {
        let mut game = session();
        game.player.pos = Position::new(4, 1);
        game.apply_player_pickup();
        game.ghosts[0].pos = game.player.pos;
        let before = ghost_positions(&game);
        game.resolve_ghost_contacts(game.player.pos, &before);
        let score = game.score;

        let contact = game.resolve_ghost_contacts(game.player.pos, &before);
        assert_eq!(contact, Contact::Clear);
        assert_eq!(game.score, score);
    }

    #[test]
    fn roaming_ghost_catches_player_and_short_circuits() {
        let mut game = session();
        game.player.pos = Position::new(4, 1);
        game.apply_player_pickup();
        game.ghosts[0].mode = GhostMode::Chase;
        game.ghosts[0].pos = game.player.pos;
        game.ghosts[1].pos = game.player.pos;
        let before = ghost_positions(&game);

        let contact = game.resolve_ghost_contacts(game.player.pos, &before);
        assert_eq!(contact, Contact::PlayerCaught);
        assert_eq!(game.ghosts[1].mode, GhostMode::Frightened);
    }

    #[test]
    fn swapping_tiles_counts_as_contact() {
        let mut game = session();
        let player_before = Position::new(2, 1);
        let player_now = Position::new(3, 1);
        game.player.pos = player_now;
        let mut before = ghost_positions(&game);
        before[0] = player_now;
        game.ghosts[0].pos = player_before;
        game.ghosts[0].mode = GhostMode::Scatter;

        let contact = game.resolve_ghost_contacts(player_before, &before);
        assert_eq!(contact, Contact::PlayerCaught);
    }

    #[test]
    fn clearing_last_dot_reports_level_clear_once() {
        let mut game = session();
        let dots: Vec<Position> = (0..game.maze.height())
            .flat_map(|y| (0..game.maze.width()).map(move |x| Position::new(x, y)))
            .filter(|pos| {
                matches!(
                    game.maze.tile_at(*pos),
                    crate::types::Tile::Dot | crate::types::Tile::PowerPellet
                )
            })
            .collect();
        let total = dots.len();
        let mut clears = 0;
        for (i, pos) in dots.into_iter().enumerate() {
            game.player.pos = pos;
            if game.apply_player_pickup() {
                clears += 1;
                assert_eq!(i + 1, total);
            }
        }
        assert_eq!(clears, 1);
        assert_eq!(game.score, 10 * (total as u32 - 1) + 50);
        assert!(game
            .events
            .iter()
            .any(|event| matches!(event, RuntimeEvent::PowerModeStarted { .. })));
    }

    #[test]
    fn high_score_tracks_score() {
        let mut game = session();
        game.add_score(120);
        assert_eq!(game.high_score, 120);
    }
}
