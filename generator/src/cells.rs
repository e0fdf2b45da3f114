//! Cell addressing for the square grid both layouts are built on.

use common::{geo, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

/// Index into a row-major `vec` of per-cell state.
pub fn index(cell: Cell, grid_size: u32) -> usize {
    (cell.y * grid_size + cell.x) as usize
}

/// Node ids count up from 1 in row-major order.
pub fn node_id(cell: Cell, grid_size: u32) -> u64 {
    u64::from(cell.y) * u64::from(grid_size) + u64::from(cell.x) + 1
}

/// In-bounds 4-neighbors of a cell.
pub fn neighbors(cell: Cell, grid_size: u32) -> Vec<Cell> {
    const OFFSETS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

    let mut neighbors = Vec::with_capacity(4);
    for (dx, dy) in OFFSETS {
        let nx = i64::from(cell.x) + dx;
        let ny = i64::from(cell.y) + dy;
        if (0..i64::from(grid_size)).contains(&nx) && (0..i64::from(grid_size)).contains(&ny) {
            neighbors.push(Cell {
                x: nx as u32,
                y: ny as u32,
            });
        }
    }
    neighbors
}

/// One node per cell, in row-major generation order. The x axis maps to
/// latitude and the y axis to longitude.
pub fn grid_nodes(grid_size: u32, spacing: f64) -> Vec<Node> {
    let mut nodes = Vec::with_capacity((grid_size * grid_size) as usize);
    for y in 0..grid_size {
        for x in 0..grid_size {
            nodes.push(Node {
                id: node_id(Cell { x, y }, grid_size).to_string(),
                lat: geo::cell_coordinate(x, spacing),
                lon: geo::cell_coordinate(y, spacing),
            });
        }
    }
    nodes
}
