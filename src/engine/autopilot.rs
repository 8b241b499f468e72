use std::collections::{HashSet, VecDeque};

use crate::maze::Maze;
use crate::types::{Direction, GhostMode, Position, Tile};

use super::GameSession;

/// Deterministic dot-seeking intent for headless play.
///
/// Walks a BFS toward the nearest pellet while treating roaming ghosts and the
/// tiles next to them as walls. When no safe route exists the ghosts are
/// ignored; when nothing is reachable at all the current heading is kept.
pub fn choose_direction(session: &GameSession) -> Direction {
    let start = session.player.pos;
    let danger = danger_cells(session);

    first_step_to_pellet(&session.maze, start, &danger)
        .or_else(|| first_step_to_pellet(&session.maze, start, &HashSet::new()))
        .unwrap_or(session.player.dir)
}

fn danger_cells(session: &GameSession) -> HashSet<Position> {
    let mut out = HashSet::new();
    for ghost in &session.ghosts {
        if !matches!(ghost.mode, GhostMode::Chase | GhostMode::Scatter) {
            continue;
        }
        out.insert(ghost.pos);
        for dir in Direction::MOVES {
            out.insert(session.maze.next_position(ghost.pos, dir));
        }
    }
    out
}

fn first_step_to_pellet(
    maze: &Maze,
    start: Position,
    blocked: &HashSet<Position>,
) -> Option<Direction> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start);

    for dir in Direction::MOVES {
        if !maze.can_step(start, dir, false) {
            continue;
        }
        let next = maze.next_position(start, dir);
        if blocked.contains(&next) || !seen.insert(next) {
            continue;
        }
        queue.push_back((next, dir));
    }

    while let Some((pos, first)) = queue.pop_front() {
        if matches!(maze.tile_at(pos), Tile::Dot | Tile::PowerPellet) {
            return Some(first);
        }
        for dir in Direction::MOVES {
            if !maze.can_step(pos, dir, false) {
                continue;
            }
            let next = maze.next_position(pos, dir);
            if blocked.contains(&next) || !seen.insert(next) {
                continue;
            }
            queue.push_back((next, first));
        }
    }
    None
}
