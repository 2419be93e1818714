//! Converts a maze wall grid into static world triangles.
//!
//! Grid block `(row, col)` occupies `x in [col, col + 1] * cell_size` and
//! `z in [row, row + 1] * cell_size`. The floor is one quad under the whole
//! grid at `y = 0`. Each solid block contributes one quad per side that faces
//! an open block, with its front face pointing into the open space. Sides
//! between two solid blocks and sides on the grid border are never visible and
//! produce nothing.

use crate::math::vec::Vec3;
use crate::maze::generator::{Cell, Maze};

/// Two triangles covering the parallelogram `corner, corner + u, corner + u + v, corner + v`.
///
/// Both triangles face `v x u`.
fn quad(corner: Vec3, u: Vec3, v: Vec3) -> [[Vec3; 3]; 2] {
    [
        [corner, corner + u, corner + u + v],
        [corner, corner + u + v, corner + v],
    ]
}

/// Builds the floor and wall triangles for `maze`.
///
/// # Arguments
///
/// * `cell_size` - World size of one grid block
/// * `wall_height` - Height of every wall quad
pub fn build_triangles(maze: &Maze, cell_size: f32, wall_height: f32) -> Vec<[Vec3; 3]> {
    let (columns, rows) = maze.grid_size();
    let up = Vec3::Y * wall_height;
    let along_x = Vec3::X * cell_size;
    let along_z = Vec3::Z * cell_size;

    let mut triangles = Vec::new();
    triangles.extend(quad(
        Vec3::ZERO,
        Vec3::X * (columns as f32 * cell_size),
        Vec3::Z * (rows as f32 * cell_size),
    ));

    for row in 0..rows {
        for col in 0..columns {
            if !maze.walls[row][col] {
                continue;
            }

            let x0 = col as f32 * cell_size;
            let z0 = row as f32 * cell_size;
            let x1 = x0 + cell_size;
            let z1 = z0 + cell_size;

            // -Z side
            if row > 0 && !maze.walls[row - 1][col] {
                triangles.extend(quad(Vec3::new(x0, 0.0, z0), along_x, up));
            }
            // +Z side
            if row + 1 < rows && !maze.walls[row + 1][col] {
                triangles.extend(quad(Vec3::new(x0, 0.0, z1), up, along_x));
            }
            // -X side
            if col > 0 && !maze.walls[row][col - 1] {
                triangles.extend(quad(Vec3::new(x0, 0.0, z0), up, along_z));
            }
            // +X side
            if col + 1 < columns && !maze.walls[row][col + 1] {
                triangles.extend(quad(Vec3::new(x1, 0.0, z0), along_z, up));
            }
        }
    }

    triangles
}

/// Floor-level world position at the centre of `cell`.
pub fn cell_center(cell: Cell, cell_size: f32) -> Vec3 {
    let (row, col) = cell.grid_position();
    Vec3::new(
        (col as f32 + 0.5) * cell_size,
        0.0,
        (row as f32 + 0.5) * cell_size,
    )
}
