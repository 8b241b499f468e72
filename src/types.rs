use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Evaluation order used for ghost candidates; ties resolve to the earlier entry.
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }
}

/// Grid coordinates. `x` may briefly sit at -1 or `width` before tunnel wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Unit step without any wrap normalization.
    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance_sq(self, other: Position) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    Empty,
    Wall,
    Dot,
    PowerPellet,
    GhostHouse,
    Tunnel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PelletKind {
    Dot,
    PowerPellet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Ready,
    Playing,
    Paused,
    Dying,
    GameOver,
    Win,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Chase,
    Scatter,
    Frightened,
    Eaten,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostName {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostName {
    /// Names handed to ghost homes in row-major order. On the classic board this puts
    /// Blinky at (13,11), Clyde at (14,11), Inky at (13,14) and Pinky at (14,14).
    pub const SPAWN_ORDER: [GhostName; 4] = [
        GhostName::Blinky,
        GhostName::Clyde,
        GhostName::Inky,
        GhostName::Pinky,
    ];
}

/// Control input delivered by the surrounding application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Start,
    Pause,
    Resume,
    Respawn,
    Restart,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepInput {
    pub direction: Option<Direction>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    #[serde(rename = "nextDir")]
    pub next_dir: Direction,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub name: GhostName,
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub mode: GhostMode,
    /// Frightened and the power window is about to close.
    pub flashing: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    DotEaten {
        x: i32,
        y: i32,
    },
    PelletEaten {
        x: i32,
        y: i32,
    },
    PowerModeStarted {
        ticks: u32,
    },
    PowerModeEnded,
    GhostEaten {
        ghost: GhostName,
        points: u32,
    },
    GhostHome {
        ghost: GhostName,
    },
    PlayerDied {
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    LevelCleared {
        level: u32,
    },
    GameOver {
        score: u32,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub tick: u64,
    pub state: GameState,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub state: GameState,
    pub score: u32,
    #[serde(rename = "highScore")]
    pub high_score: u32,
    pub lives: u32,
    pub level: u32,
    #[serde(rename = "dotsCollected")]
    pub dots_collected: u32,
    #[serde(rename = "totalDots")]
    pub total_dots: u32,
    #[serde(rename = "powerActive")]
    pub power_active: bool,
    #[serde(rename = "powerTicksLeft")]
    pub power_ticks_left: u32,
    #[serde(rename = "powerWarning")]
    pub power_warning: bool,
    #[serde(rename = "stepIntervalMs")]
    pub step_interval_ms: u64,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
}
