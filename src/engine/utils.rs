use rand::rngs::StdRng;
use rand::Rng;

use crate::maze::Maze;
use crate::types::{Direction, Position};

/// Passable moves for a ghost, minus the 180° turn unless it is the only way out.
pub(super) fn ghost_options(maze: &Maze, pos: Position, current: Direction) -> Vec<Direction> {
    let reverse = current.opposite();
    let mut out: Vec<Direction> = Direction::MOVES
        .into_iter()
        .filter(|dir| *dir != reverse)
        .filter(|dir| maze.can_step(pos, *dir, true))
        .collect();

    if out.is_empty() && reverse != Direction::None && maze.can_step(pos, reverse, true) {
        out.push(reverse);
    }
    out
}

/// One-step lookahead toward `target`; the first candidate wins ties.
pub(super) fn toward(
    maze: &Maze,
    pos: Position,
    options: &[Direction],
    target: Position,
) -> Option<Direction> {
    let mut best: Option<(Direction, i64)> = None;
    for dir in options {
        let dist = maze.next_position(pos, *dir).distance_sq(target);
        if best.map(|(_, best_dist)| dist < best_dist).unwrap_or(true) {
            best = Some((*dir, dist));
        }
    }
    best.map(|(dir, _)| dir)
}

/// Keeps heading with probability `keep_chance`, otherwise picks uniformly.
pub(super) fn wander(
    rng: &mut StdRng,
    options: &[Direction],
    current: Direction,
    keep_chance: f64,
) -> Option<Direction> {
    if options.is_empty() {
        return None;
    }
    if options.contains(&current) && rng.random_bool(keep_chance) {
        return Some(current);
    }
    Some(options[rng.random_range(0..options.len())])
}
