pub const DOT_SCORE: u32 = 10;
pub const POWER_PELLET_SCORE: u32 = 50;
pub const GHOST_BASE_BOUNTY: u32 = 200;

pub const GHOST_COUNT: usize = 4;

pub const DEFAULT_STARTING_LIVES: u32 = 3;
pub const POWER_DURATION_TICKS: u32 = 80;
pub const POWER_WARNING_TICKS: u32 = 20;
pub const SCATTER_CYCLE_TICKS: u32 = 200;
pub const SCATTER_WINDOW_TICKS: u32 = 50;
pub const SCATTER_KEEP_DIRECTION_CHANCE: f64 = 0.7;

pub const BASE_STEP_INTERVAL_MS: u64 = 120;
pub const MIN_STEP_INTERVAL_MS: u64 = 60;
pub const STEP_INTERVAL_DECREMENT_MS: u64 = 10;
pub const RESPAWN_DELAY_MS: u64 = 1_500;

pub const CLASSIC_WIDTH: i32 = 28;
pub const CLASSIC_HEIGHT: i32 = 31;

/// Classic 28x31 board. `P` marks the player start, `G` the four ghost homes.
pub const CLASSIC_TEMPLATE: &[&str] = &[
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##    GG    ##.#     ",
    "     #.## ###--### ##.#     ",
    "######.## #      # ##.######",
    "T     .   #  GG  #   .     T",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##....... P.......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

pub fn step_interval_ms(
    level: u32,
    base_ms: u64,
    min_ms: u64,
    decrement_ms: u64,
) -> u64 {
    if level <= 1 {
        return base_ms;
    }
    base_ms
        .saturating_sub((level as u64).saturating_mul(decrement_ms))
        .max(min_ms)
}
