use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::{GameError, SetupError};
use crate::maze::Maze;
use crate::types::{
    Direction, GameState, GhostName, PlayerView, Position, RuntimeEvent, Signal, Snapshot,
    StepInput, StepReport,
};

mod autopilot;
mod ghost_system;
mod power;
mod scoring_system;
mod utils;

pub use self::autopilot::choose_direction;
pub use self::ghost_system::Ghost;

use self::power::{PowerTick, PowerTimer};
use self::scoring_system::Contact;

#[derive(Clone, Debug)]
struct Player {
    pos: Position,
    start: Position,
    dir: Direction,
    next_dir: Direction,
}

impl Player {
    fn new(start: Position) -> Self {
        Self {
            pos: start,
            start,
            dir: Direction::None,
            next_dir: Direction::None,
        }
    }

    fn reset(&mut self) {
        self.pos = self.start;
        self.dir = Direction::None;
        self.next_dir = Direction::None;
    }

    fn view(&self) -> PlayerView {
        PlayerView {
            x: self.pos.x,
            y: self.pos.y,
            dir: self.dir,
            next_dir: self.next_dir,
        }
    }
}

/// One game from Ready to GameOver, driven by `step` and `handle_signal`.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    maze: Maze,
    rng: StdRng,
    player: Player,
    ghosts: Vec<Ghost>,
    power: PowerTimer,
    events: Vec<RuntimeEvent>,

    state: GameState,
    score: u32,
    high_score: u32,
    lives: u32,
    level: u32,
    dots_collected: u32,
    ghosts_eaten_total: u32,
    tick: u64,
}

impl GameSession {
    /// Session on the built-in 28x31 board.
    pub fn new(config: GameConfig) -> Result<Self, SetupError> {
        Self::with_maze(config, Maze::classic()?)
    }

    pub fn with_template(config: GameConfig, text: &str) -> Result<Self, SetupError> {
        Self::with_maze(config, Maze::parse(text)?)
    }

    pub fn with_rows<S: AsRef<str>>(config: GameConfig, rows: &[S]) -> Result<Self, SetupError> {
        Self::with_maze(config, Maze::from_rows(rows)?)
    }

    pub fn with_maze(config: GameConfig, maze: Maze) -> Result<Self, SetupError> {
        config.validate()?;

        let ghosts = GhostName::SPAWN_ORDER
            .into_iter()
            .zip(maze.ghost_homes().iter().copied())
            .map(|(name, home)| Ghost::new(name, home))
            .collect();
        info!(
            width = maze.width(),
            height = maze.height(),
            dots = maze.total_dots(),
            seed = config.seed,
            "level loaded"
        );

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            player: Player::new(maze.player_start()),
            ghosts,
            power: PowerTimer::default(),
            events: Vec::new(),
            state: GameState::Ready,
            score: 0,
            high_score: 0,
            lives: config.starting_lives,
            level: 1,
            dots_collected: 0,
            ghosts_eaten_total: 0,
            tick: 0,
            config,
            maze,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn dots_collected(&self) -> u32 {
        self.dots_collected
    }

    pub fn ghosts_eaten(&self) -> u32 {
        self.ghosts_eaten_total
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn player_position(&self) -> Position {
        self.player.pos
    }

    pub fn player_direction(&self) -> Direction {
        self.player.dir
    }

    pub fn power_active(&self) -> bool {
        self.power.is_active()
    }

    /// Interval the tick source should use for the current level.
    pub fn step_interval_ms(&self) -> u64 {
        self.config.step_interval_for_level(self.level)
    }

    /// Buffered intent; the latest call before a step wins.
    pub fn set_next_direction(&mut self, dir: Direction) {
        self.player.next_dir = dir;
    }

    pub fn step(&mut self, input: StepInput) -> Result<StepReport, GameError> {
        if self.state != GameState::Playing {
            return Err(GameError::NotPlaying(self.state));
        }
        if let Some(dir) = input.direction {
            self.player.next_dir = dir;
        }
        self.tick += 1;

        self.update_power();
        let player_before = self.player.pos;
        let ghosts_before: Vec<Position> = self.ghosts.iter().map(|ghost| ghost.pos).collect();

        if self.update_player() {
            self.complete_level();
        } else {
            self.update_ghosts();
            if self.resolve_ghost_contacts(player_before, &ghosts_before) == Contact::PlayerCaught
            {
                self.lose_life();
            }
        }

        Ok(StepReport {
            tick: self.tick,
            state: self.state,
            events: std::mem::take(&mut self.events),
        })
    }

    pub fn handle_signal(&mut self, signal: Signal) -> Result<GameState, GameError> {
        let next = match (signal, self.state) {
            (Signal::Start, GameState::Ready) => GameState::Playing,
            (Signal::Pause, GameState::Playing) => GameState::Paused,
            (Signal::Resume, GameState::Paused) => GameState::Playing,
            (Signal::Respawn, GameState::Dying) => {
                self.respawn();
                GameState::Playing
            }
            (Signal::Restart, GameState::GameOver | GameState::Win) => {
                self.restart();
                GameState::Ready
            }
            (signal, state) => return Err(GameError::InvalidSignal { signal, state }),
        };
        debug!(?signal, from = ?self.state, to = ?next, "signal applied");
        self.state = next;
        Ok(next)
    }

    pub fn snapshot(&self) -> Snapshot {
        let warning = self.power.is_warning(self.config.power_warning_ticks);
        Snapshot {
            tick: self.tick,
            state: self.state,
            score: self.score,
            high_score: self.high_score,
            lives: self.lives,
            level: self.level,
            dots_collected: self.dots_collected,
            total_dots: self.maze.total_dots(),
            power_active: self.power.is_active(),
            power_ticks_left: self.power.remaining(),
            power_warning: warning,
            step_interval_ms: self.step_interval_ms(),
            player: self.player.view(),
            ghosts: self.ghosts.iter().map(|ghost| ghost.view(warning)).collect(),
        }
    }

    fn update_power(&mut self) {
        if self.power.tick() == PowerTick::Expired {
            self.calm_ghosts();
            debug!(tick = self.tick, "power mode ended");
            self.events.push(RuntimeEvent::PowerModeEnded);
        }
    }

    /// Moves the player one tile. Returns true when the move cleared the level.
    fn update_player(&mut self) -> bool {
        let pos = self.player.pos;
        let wanted = self.player.next_dir;
        if wanted != Direction::None && self.maze.can_step(pos, wanted, false) {
            self.player.dir = wanted;
        }

        let dir = self.player.dir;
        if !self.maze.can_step(pos, dir, false) {
            return false;
        }
        self.player.pos = self.maze.next_position(pos, dir);
        self.apply_player_pickup()
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(RuntimeEvent::PlayerDied {
            lives_left: self.lives,
        });
        info!(lives_left = self.lives, tick = self.tick, "player caught");

        if self.lives == 0 {
            self.state = GameState::GameOver;
            self.high_score = self.high_score.max(self.score);
            info!(score = self.score, level = self.level, "game over");
            self.events.push(RuntimeEvent::GameOver { score: self.score });
        } else {
            self.state = GameState::Dying;
        }
    }

    fn respawn(&mut self) {
        self.power.clear();
        self.player.reset();
        self.reset_ghosts();
    }

    fn complete_level(&mut self) {
        self.state = GameState::Win;
        info!(level = self.level, score = self.score, "level cleared");
        self.events.push(RuntimeEvent::LevelCleared { level: self.level });

        self.level += 1;
        self.maze.reset();
        self.dots_collected = 0;
        self.respawn();
        self.state = GameState::Playing;
    }

    fn restart(&mut self) {
        self.maze.reset();
        self.respawn();
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.level = 1;
        self.dots_collected = 0;
        self.ghosts_eaten_total = 0;
        self.tick = 0;
        self.events.clear();
        info!(high_score = self.high_score, "game restarted");
    }
}
