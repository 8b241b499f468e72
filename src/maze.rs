use std::collections::{HashSet, VecDeque};

use crate::constants::{CLASSIC_TEMPLATE, GHOST_COUNT};
use crate::error::LevelError;
use crate::types::{Direction, PelletKind, Position, Tile};

/// Tile grid for one level. Layout is fixed after load; only pellets change.
#[derive(Clone, Debug)]
pub struct Maze {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    pristine: Vec<Tile>,
    total_dots: u32,
    remaining_dots: u32,
    player_start: Position,
    ghost_homes: Vec<Position>,
}

impl Maze {
    pub fn classic() -> Result<Self, LevelError> {
        Self::from_rows(CLASSIC_TEMPLATE)
    }

    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text.lines().collect();
        Self::from_rows(&rows)
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        let Some(first) = rows.first() else {
            return Err(LevelError::Empty);
        };
        let expected = first.as_ref().chars().count();
        if expected == 0 {
            return Err(LevelError::Empty);
        }

        let width = expected as i32;
        let height = rows.len() as i32;
        let mut tiles = Vec::with_capacity(expected * rows.len());
        let mut player_start = None;
        let mut ghost_homes = Vec::new();

        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(LevelError::RaggedRow {
                    row: row_idx,
                    expected,
                    found,
                });
            }
            for (col_idx, ch) in row.chars().enumerate() {
                let pos = Position::new(col_idx as i32, row_idx as i32);
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Dot,
                    'o' => Tile::PowerPellet,
                    '-' => Tile::GhostHouse,
                    'T' => Tile::Tunnel,
                    ' ' => Tile::Empty,
                    'P' => {
                        if player_start.is_some() {
                            return Err(LevelError::DuplicatePlayerStart(pos));
                        }
                        player_start = Some(pos);
                        Tile::Empty
                    }
                    'G' => {
                        ghost_homes.push(pos);
                        Tile::Empty
                    }
                    _ => {
                        return Err(LevelError::UnknownTile {
                            ch,
                            x: pos.x,
                            y: pos.y,
                        })
                    }
                };
                tiles.push(tile);
            }
        }

        let player_start = player_start.ok_or(LevelError::MissingPlayerStart)?;
        if ghost_homes.len() != GHOST_COUNT {
            return Err(LevelError::GhostHomeCount {
                expected: GHOST_COUNT,
                found: ghost_homes.len(),
            });
        }

        let total_dots = tiles
            .iter()
            .filter(|tile| matches!(tile, Tile::Dot | Tile::PowerPellet))
            .count() as u32;
        if total_dots == 0 {
            return Err(LevelError::NoDots);
        }

        let maze = Self {
            width,
            height,
            pristine: tiles.clone(),
            tiles,
            total_dots,
            remaining_dots: total_dots,
            player_start,
            ghost_homes,
        };
        maze.validate_paths()?;
        Ok(maze)
    }

    fn validate_paths(&self) -> Result<(), LevelError> {
        if !self.is_passable(self.player_start, false) {
            return Err(LevelError::BlockedPlayerStart(self.player_start));
        }

        let reachable = self.reachable_from(self.player_start, false);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                let is_pellet = matches!(self.tile_at(pos), Tile::Dot | Tile::PowerPellet);
                if is_pellet && !reachable.contains(&pos) {
                    return Err(LevelError::UnreachablePellet(pos));
                }
            }
        }

        for home in &self.ghost_homes {
            if !self.reachable_from(*home, true).contains(&self.player_start) {
                return Err(LevelError::StrandedGhostHome(*home));
            }
        }
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn total_dots(&self) -> u32 {
        self.total_dots
    }

    pub fn remaining_dots(&self) -> u32 {
        self.remaining_dots
    }

    pub fn player_start(&self) -> Position {
        self.player_start
    }

    pub fn ghost_homes(&self) -> &[Position] {
        &self.ghost_homes
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    /// Out-of-range positions read as walls; wrap horizontally first.
    pub fn tile_at(&self, pos: Position) -> Tile {
        self.index_of(pos)
            .and_then(|idx| self.tiles.get(idx).copied())
            .unwrap_or(Tile::Wall)
    }

    pub fn consume(&mut self, pos: Position) -> Option<PelletKind> {
        let idx = self.index_of(pos)?;
        let kind = match self.tiles[idx] {
            Tile::Dot => PelletKind::Dot,
            Tile::PowerPellet => PelletKind::PowerPellet,
            _ => return None,
        };
        self.tiles[idx] = Tile::Empty;
        self.remaining_dots = self.remaining_dots.saturating_sub(1);
        Some(kind)
    }

    pub fn is_passable(&self, pos: Position, for_ghost: bool) -> bool {
        match self.tile_at(pos) {
            Tile::Wall => false,
            Tile::GhostHouse => for_ghost,
            Tile::Empty | Tile::Dot | Tile::PowerPellet | Tile::Tunnel => true,
        }
    }

    /// Normalizes a horizontal overrun to the opposite edge. Vertical overruns stay illegal.
    pub fn wrap(&self, pos: Position) -> Position {
        if pos.x < 0 || pos.x >= self.width {
            Position::new(pos.x.rem_euclid(self.width), pos.y)
        } else {
            pos
        }
    }

    pub fn next_position(&self, pos: Position, dir: Direction) -> Position {
        self.wrap(pos.offset(dir))
    }

    pub fn can_step(&self, pos: Position, dir: Direction, for_ghost: bool) -> bool {
        dir != Direction::None && self.is_passable(self.next_position(pos, dir), for_ghost)
    }

    pub fn reachable_from(&self, start: Position, for_ghost: bool) -> HashSet<Position> {
        let mut out = HashSet::new();
        if !self.is_passable(start, for_ghost) {
            return out;
        }

        let mut queue = VecDeque::new();
        out.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            for dir in Direction::MOVES {
                let next = self.next_position(pos, dir);
                if !self.is_passable(next, for_ghost) {
                    continue;
                }
                if out.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        out
    }

    /// Restores every consumed pellet.
    pub fn reset(&mut self) {
        self.tiles.clone_from(&self.pristine);
        self.remaining_dots = self.total_dots;
    }
}
