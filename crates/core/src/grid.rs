//! Square cell buffer shared by hazards, search and movement.
//! This module owns terrain/occupancy storage and seeded maze construction.
//! It does not own device timing or agent decision flow.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::types::{Cell, Pos};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![Cell::Empty; size * size] }
    }

    /// Builds a grid from text rows. `.` empty, `#` wall, `C` controlled agent,
    /// `A` autonomous agent, `B` device, `F` fire. Rows must be square.
    pub fn parse(rows: &[&str]) -> Option<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.chars().count() != size {
                return None;
            }
            for glyph in row.chars() {
                cells.push(match glyph {
                    '.' => Cell::Empty,
                    '#' => Cell::Wall,
                    'C' => Cell::ControlledAgent,
                    'A' => Cell::AutonomousAgent,
                    'B' => Cell::Device,
                    'F' => Cell::Fire,
                    _ => return None,
                });
            }
        }
        Some(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    /// Out-of-bounds positions read as `Wall`.
    pub fn cell_at(&self, pos: Pos) -> Cell {
        if !self.in_bounds(pos) {
            return Cell::Wall;
        }
        self.cells[self.index(pos)]
    }

    pub fn set_cell(&mut self, pos: Pos, value: Cell) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.cells[idx] = value;
    }

    pub fn is_passable_for_search(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !matches!(self.cell_at(pos), Cell::Wall | Cell::Device | Cell::Fire)
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.size)
            .flat_map(move |y| (0..self.size).map(move |x| Pos { y: y as i32, x: x as i32 }))
    }

    pub fn count(&self, value: Cell) -> usize {
        self.cells.iter().filter(|cell| **cell == value).count()
    }

    /// Row-major text dump using the same glyphs as [`Grid::parse`].
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => '.',
                        Cell::Wall => '#',
                        Cell::ControlledAgent => 'C',
                        Cell::AutonomousAgent => 'A',
                        Cell::Device => 'B',
                        Cell::Fire => 'F',
                    })
                    .collect()
            })
            .collect()
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.size + (pos.x as usize)
    }
}

pub fn controlled_spawn() -> Pos {
    Pos { y: 0, x: 0 }
}

pub fn autonomous_spawn(size: usize) -> Pos {
    let last = size as i32 - 1;
    Pos { y: last, x: last }
}

/// Cells kept wall-free so both agents (and a third spawn corner) can leave their corner.
fn spawn_safety_border(size: usize) -> [Pos; 9] {
    let last = size as i32 - 1;
    [
        Pos::new(0, 0),
        Pos::new(0, 1),
        Pos::new(1, 0),
        Pos::new(last, last),
        Pos::new(last - 1, last),
        Pos::new(last, last - 1),
        Pos::new(0, last),
        Pos::new(0, last - 1),
        Pos::new(1, last),
    ]
}

/// Seeded maze construction: `wall_percentage` of the non-border cells become walls,
/// then both agent markers are written on their spawn corners.
pub fn build_grid(size: usize, wall_percentage: u8, seed: u64) -> Grid {
    let mut grid = Grid::new(size);
    let forbidden = spawn_safety_border(size);
    let candidates: Vec<Pos> =
        grid.positions().filter(|pos| !forbidden.contains(pos)).collect();

    let free_cells = (size * size).saturating_sub(forbidden.len());
    let wall_count = (free_cells * usize::from(wall_percentage.min(100)) / 100).min(candidates.len());

    // Partial Fisher-Yates over the candidate list keeps placement bounded even at 100%.
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pool = candidates;
    for placed in 0..wall_count {
        let remaining = pool.len() - placed;
        let pick = placed + (rng.next_u64() % remaining as u64) as usize;
        pool.swap(placed, pick);
        grid.set_cell(pool[placed], Cell::Wall);
    }

    grid.set_cell(controlled_spawn(), Cell::ControlledAgent);
    grid.set_cell(autonomous_spawn(size), Cell::AutonomousAgent);
    grid
}
