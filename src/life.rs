//! The board and its update rules.

use anyhow::{bail, Result};
use rand::Rng;

/// Chance for any cell to start alive when a board is seeded.
const SPAWN_CHANCE: f64 = 0.3;

/// Row/column offsets of the eight surrounding cells.
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One board position: its life state plus the neighbour tally from the
/// most recent counting pass.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    alive: bool,
    neighbours: u8,
}

impl Cell {
    fn spawn(rng: &mut impl Rng) -> Self {
        Self {
            alive: rng.gen_bool(SPAWN_CHANCE),
            neighbours: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn neighbours(&self) -> u8 {
        self.neighbours
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn resurrect(&mut self) {
        self.alive = true;
    }
}

/// A square Life board. Coordinates are `(row, col)` from the top-left
/// corner; the board has hard edges and never wraps.
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Seeds a `size`-by-`size` board from `rng`, each cell independently
    /// alive with probability [`SPAWN_CHANCE`].
    pub fn new(size: usize, rng: &mut impl Rng) -> Result<Self> {
        if size == 0 {
            bail!("grid size must be at least 1");
        }
        let cells = (0..size * size).map(|_| Cell::spawn(rng)).collect();
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[self.idx(row, col)].alive
    }

    /// Forces one cell's state, for carving patterns into the board.
    /// Coordinates off the board are ignored.
    pub fn set_alive(&mut self, row: usize, col: usize, alive: bool) {
        if row >= self.size || col >= self.size {
            return;
        }
        let i = self.idx(row, col);
        if alive {
            self.cells[i].resurrect();
        } else {
            self.cells[i].kill();
        }
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    /// Overwrites one cell's neighbour tally with a fresh count of its
    /// live in-bounds neighbours. Reads alive state only; a cell never
    /// counts itself, and edge cells simply see fewer neighbours.
    fn count_neighbours(&mut self, row: usize, col: usize) {
        let mut count = 0u8;
        for (dr, dc) in NEIGHBOUR_OFFSETS {
            let r = row as isize + dr;
            let c = col as isize + dc;
            if self.in_bounds(r, c) && self.cells[self.idx(r as usize, c as usize)].alive {
                count += 1;
            }
        }
        let i = self.idx(row, col);
        self.cells[i].neighbours = count;
    }

    /// Settles one cell's fate from its stored neighbour tally. The four
    /// outcomes are disjoint arms of a single match, so a cell cannot take
    /// two transitions in one generation.
    fn apply_rule(&mut self, row: usize, col: usize) {
        let i = self.idx(row, col);
        let cell = &mut self.cells[i];
        match (cell.alive, cell.neighbours) {
            (true, 0..=1) => cell.kill(),   // underpopulation
            (true, 4..=8) => cell.kill(),   // overcrowding
            (false, 3) => cell.resurrect(), // reproduction
            _ => {}                         // survival, or stays dead
        }
    }

    /// Advances the board one generation: a counting pass over every cell,
    /// then a rule pass. No rule runs until every tally reflects the
    /// outgoing generation.
    pub fn tick(&mut self) {
        for row in 0..self.size {
            for col in 0..self.size {
                self.count_neighbours(row, col);
            }
        }
        for row in 0..self.size {
            for col in 0..self.size {
                self.apply_rule(row, col);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(size: usize, seed: u64) -> Grid {
        let mut rng = StdRng::seed_from_u64(seed);
        Grid::new(size, &mut rng).unwrap()
    }

    fn cleared(size: usize) -> Grid {
        let mut grid = seeded(size, 0);
        for cell in &mut grid.cells {
            cell.kill();
        }
        grid
    }

    fn count_pass(grid: &mut Grid) {
        for row in 0..grid.size() {
            for col in 0..grid.size() {
                grid.count_neighbours(row, col);
            }
        }
    }

    #[test]
    fn grid_allocates_size_squared_cells() {
        let grid = seeded(7, 1);
        assert_eq!(grid.size(), 7);
        assert_eq!(grid.cells.len(), 49);
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Grid::new(0, &mut rng).is_err());
    }

    #[test]
    fn fresh_cells_start_with_zero_neighbour_tally() {
        let grid = seeded(5, 1);
        assert!(grid.cells.iter().all(|c| c.neighbours() == 0));
    }

    #[test]
    fn about_a_third_of_cells_spawn_alive() {
        let grid = seeded(50, 99);
        let live = grid.population();
        assert!(
            (500..1000).contains(&live),
            "unexpected spawn density: {live}/2500"
        );
    }

    #[test]
    fn same_seed_spawns_the_same_board() {
        let a = seeded(16, 42);
        let b = seeded(16, 42);
        for row in 0..16 {
            for col in 0..16 {
                assert_eq!(a.is_alive(row, col), b.is_alive(row, col));
            }
        }
    }

    #[test]
    fn kill_and_resurrect_are_idempotent() {
        let mut cell = Cell {
            alive: false,
            neighbours: 0,
        };
        cell.resurrect();
        cell.resurrect();
        assert!(cell.is_alive());
        cell.kill();
        cell.kill();
        assert!(!cell.is_alive());
    }

    #[test]
    fn counting_skips_self_and_out_of_bounds() {
        let mut grid = cleared(3);
        grid.set_alive(1, 1, true);
        count_pass(&mut grid);

        // the live centre has no live neighbours; everyone else sees exactly it
        assert_eq!(grid.cells[grid.idx(1, 1)].neighbours(), 0);
        for row in 0..3 {
            for col in 0..3 {
                if (row, col) != (1, 1) {
                    assert_eq!(grid.cells[grid.idx(row, col)].neighbours(), 1);
                }
            }
        }
    }

    #[test]
    fn corner_edge_and_centre_tallies_on_a_full_board() {
        let mut grid = cleared(3);
        for row in 0..3 {
            for col in 0..3 {
                grid.set_alive(row, col, true);
            }
        }
        count_pass(&mut grid);

        assert_eq!(grid.cells[grid.idx(0, 0)].neighbours(), 3);
        assert_eq!(grid.cells[grid.idx(0, 1)].neighbours(), 5);
        assert_eq!(grid.cells[grid.idx(1, 1)].neighbours(), 8);
    }

    #[test]
    fn recounting_without_rule_application_changes_nothing() {
        let mut grid = seeded(10, 7);
        count_pass(&mut grid);
        let first: Vec<u8> = grid.cells.iter().map(|c| c.neighbours()).collect();
        count_pass(&mut grid);
        let second: Vec<u8> = grid.cells.iter().map(|c| c.neighbours()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn overcrowded_cell_dies() {
        let mut grid = cleared(3);
        // plus shape: the centre has four live neighbours
        for &(row, col) in &[(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)] {
            grid.set_alive(row, col, true);
        }
        grid.tick();
        assert!(!grid.is_alive(1, 1));
    }

    #[test]
    fn dead_cell_with_exactly_three_neighbours_resurrects() {
        let mut grid = cleared(4);
        // L-tromino closes into a block
        for &(row, col) in &[(0, 0), (0, 1), (1, 0)] {
            grid.set_alive(row, col, true);
        }
        grid.tick();
        assert!(grid.is_alive(1, 1));
        assert_eq!(grid.population(), 4);
    }

    #[test]
    fn dead_cell_with_two_neighbours_stays_dead() {
        let mut grid = cleared(3);
        grid.set_alive(0, 0, true);
        grid.set_alive(2, 2, true);
        grid.tick();
        assert!(!grid.is_alive(1, 1));
    }
}
