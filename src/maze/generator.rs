//! Maze generation using Kruskal's algorithm with a Union-Find data structure.
//!
//! # Examples
//!
//! ```rust
//! use umbra::maze::generator::MazeGenerator;
//!
//! // Same seed, same maze
//! let a = MazeGenerator::new(6, 4, Some(7)).generate();
//! let b = MazeGenerator::new(6, 4, Some(7)).generate();
//! assert_eq!(a.walls, b.walls);
//! ```
use rand::prelude::*;
use rand::rngs::StdRng;

/// Represents a cell in the maze grid
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row index of the cell
    pub row: usize,
    /// Column index of the cell
    pub col: usize,
}

impl Cell {
    /// Creates a new Cell with the given coordinates
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Position of this cell in the wall grid.
    pub fn grid_position(&self) -> (usize, usize) {
        (self.row * 2 + 1, self.col * 2 + 1)
    }
}

/// Represents an edge between two adjacent cells
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub cell1: Cell,
    pub cell2: Cell,
}

impl Edge {
    pub fn new(cell1: Cell, cell2: Cell) -> Self {
        Self { cell1, cell2 }
    }

    /// The wall-grid block separating the two cells.
    fn wall(&self) -> (usize, usize) {
        (
            self.cell1.row + self.cell2.row + 1,
            self.cell1.col + self.cell2.col + 1,
        )
    }
}

/// Disjoint sets over cell indices (`row * width + col`), with path
/// compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// Creates `size` singleton sets
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    /// Finds the representative of the set containing `index`
    pub fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut current = index;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Unions the sets containing `a` and `b`.
    /// Returns true if the sets were merged, false if they were already one set
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }
}

/// A maze as a wall grid.
///
/// The grid is `(2 * height + 1) x (2 * width + 1)` blocks. Cells sit at odd
/// row and column indices; the blocks between them are walls or passages.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    /// Width of the maze in cells
    pub width: usize,
    /// Height of the maze in cells
    pub height: usize,
    /// `walls[row][col]` is true for solid blocks
    pub walls: Vec<Vec<bool>>,
}

impl Maze {
    /// Creates a maze with every block solid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walls: vec![vec![true; width * 2 + 1]; height * 2 + 1],
        }
    }

    /// Wall-grid dimensions as `(columns, rows)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.width * 2 + 1, self.height * 2 + 1)
    }

    /// Check if a cell is open
    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (row, col) = Cell::new(y, x).grid_position();
        !self.walls[row][col]
    }

    /// Whether the wall grid has a solid block at `(row, col)`; out of range counts as open.
    pub fn is_wall_block(&self, row: usize, col: usize) -> bool {
        self.walls
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Whether two orthogonally adjacent cells are joined by a passage.
    pub fn is_connected(&self, a: Cell, b: Cell) -> bool {
        let adjacent = a.row.abs_diff(b.row) + a.col.abs_diff(b.col) == 1;
        adjacent
            && self.is_walkable(a.col, a.row)
            && self.is_walkable(b.col, b.row)
            && !self.is_wall_block(a.row + b.row + 1, a.col + b.col + 1)
    }

}

/// Maze generator using Kruskal's algorithm
///
/// Every pair of adjacent cells is an edge. Edges are shuffled once, then
/// each [`MazeGenerator::step`] takes the next edge and knocks out the wall
/// between its cells if they are not yet connected.
pub struct MazeGenerator {
    maze: Maze,
    union_find: UnionFind,
    edges: Vec<Edge>,
    current_edge: usize,
    generation_complete: bool,
}

impl MazeGenerator {
    /// Creates a new generator.
    ///
    /// # Arguments
    /// * `width`, `height` - Maze size in cells
    /// * `seed` - Fixed seed for a reproducible layout; entropy when `None`
    pub fn new(width: usize, height: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut maze = Maze::new(width, height);
        let mut edges = Vec::with_capacity(width * height * 2);

        for row in 0..height {
            for col in 0..width {
                let current = Cell::new(row, col);
                let (grid_row, grid_col) = current.grid_position();
                maze.walls[grid_row][grid_col] = false;

                if col + 1 < width {
                    edges.push(Edge::new(current, Cell::new(row, col + 1)));
                }
                if row + 1 < height {
                    edges.push(Edge::new(current, Cell::new(row + 1, col)));
                }
            }
        }

        edges.shuffle(&mut rng);

        Self {
            maze,
            union_find: UnionFind::new(width * height),
            edges,
            current_edge: 0,
            generation_complete: false,
        }
    }

    /// Performs one step of maze generation.
    /// Returns true if a wall was removed in this step
    pub fn step(&mut self) -> bool {
        if self.generation_complete {
            return false;
        }

        let Some(edge) = self.edges.get(self.current_edge).copied() else {
            self.generation_complete = true;
            return false;
        };
        self.current_edge += 1;

        let width = self.maze.width;
        let index = |cell: Cell| cell.row * width + cell.col;
        if self.union_find.union(index(edge.cell1), index(edge.cell2)) {
            let (row, col) = edge.wall();
            self.maze.walls[row][col] = false;
            return true;
        }

        false
    }

    /// Checks if maze generation is complete
    pub fn is_complete(&self) -> bool {
        self.generation_complete
    }

    /// Returns the generation progress as a ratio (0.0 to 1.0)
    pub fn progress_ratio(&self) -> f32 {
        if self.edges.is_empty() {
            1.0
        } else {
            self.current_edge as f32 / self.edges.len() as f32
        }
    }

    /// The maze as generated so far.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Runs generation to completion and returns the finished maze.
    pub fn generate(mut self) -> Maze {
        while !self.is_complete() {
            self.step();
        }
        self.maze
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    fn reachable(maze: &Maze) -> usize {
        let mut seen = HashSet::from([Cell::new(0, 0)]);
        let mut queue = VecDeque::from([Cell::new(0, 0)]);

        while let Some(cell) = queue.pop_front() {
            let mut neighbours = vec![Cell::new(cell.row + 1, cell.col), Cell::new(cell.row, cell.col + 1)];
            if cell.row > 0 {
                neighbours.push(Cell::new(cell.row - 1, cell.col));
            }
            if cell.col > 0 {
                neighbours.push(Cell::new(cell.row, cell.col - 1));
            }
            for next in neighbours {
                if maze.is_connected(cell, next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len()
    }

    #[test]
    fn union_find_merges_once() {
        let mut sets = UnionFind::new(4);
        assert!(sets.union(0, 1));
        assert!(sets.union(2, 3));
        assert!(!sets.union(1, 0));
        assert!(sets.union(1, 3));
        assert_eq!(sets.find(0), sets.find(2));
    }

    #[test]
    fn generated_maze_is_a_spanning_tree() {
        let maze = MazeGenerator::new(9, 6, Some(42)).generate();
        assert_eq!(reachable(&maze), 9 * 6);

        // A spanning tree over n cells has n - 1 passages.
        let passages = (0..maze.walls.len())
            .flat_map(|row| (0..maze.walls[0].len()).map(move |col| (row, col)))
            .filter(|&(row, col)| (row + col) % 2 == 1 && !maze.walls[row][col])
            .count();
        assert_eq!(passages, 9 * 6 - 1);
    }

    #[test]
    fn border_stays_solid() {
        let maze = MazeGenerator::new(5, 5, Some(3)).generate();
        let (columns, rows) = maze.grid_size();
        for col in 0..columns {
            assert!(maze.walls[0][col] && maze.walls[rows - 1][col]);
        }
        for row in 0..rows {
            assert!(maze.walls[row][0] && maze.walls[row][columns - 1]);
        }
    }

    #[test]
    fn seed_controls_layout() {
        let a = MazeGenerator::new(8, 8, Some(1)).generate();
        let b = MazeGenerator::new(8, 8, Some(1)).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn progress_reaches_one() {
        let mut generator = MazeGenerator::new(3, 2, Some(9));
        assert_eq!(generator.progress_ratio(), 0.0);
        while !generator.is_complete() {
            generator.step();
        }
        assert_eq!(generator.progress_ratio(), 1.0);
    }

    #[test]
    fn empty_maze_completes() {
        let maze = MazeGenerator::new(0, 4, Some(5)).generate();
        assert_eq!(maze.grid_size(), (1, 9));
        assert!(maze.walls.iter().flatten().all(|&solid| solid));
    }
}
