use thiserror::Error;

use crate::types::{GameState, Position, Signal};

/// Problems found while loading a level template. Fatal to that load only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level template is empty")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile '{ch}' at ({x},{y})")]
    UnknownTile { ch: char, x: i32, y: i32 },

    #[error("level has no player start")]
    MissingPlayerStart,

    #[error("level has more than one player start (second at {0:?})")]
    DuplicatePlayerStart(Position),

    #[error("level needs exactly {expected} ghost homes, found {found}")]
    GhostHomeCount { expected: usize, found: usize },

    #[error("level has no dots to collect")]
    NoDots,

    #[error("player start {0:?} is not passable")]
    BlockedPlayerStart(Position),

    #[error("pellet at {0:?} cannot be reached from the player start")]
    UnreachablePellet(Position),

    #[error("ghost home {0:?} has no path to the player start")]
    StrandedGhostHome(Position),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Contract violations at the session boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("step invoked while the game is {0:?}")]
    NotPlaying(GameState),

    #[error("signal {signal:?} is not valid while {state:?}")]
    InvalidSignal { signal: Signal, state: GameState },
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Level(#[from] LevelError),
}
