//! Complete grid layout with every neighbor link present.

use common::{MapDocument, Way};

use crate::cells::{self, Cell};

pub const GENERATOR_NAME: &str = "full_grid_generator";

const HIGHWAY_CLASS: &str = "residential";

/// Build a full-grid map: the same node set as the maze layout, with a way
/// from every cell to its right and bottom neighbor. Nothing about the
/// topology is random; way ids count up from one past the last node id.
pub fn generate(grid_size: u32, spacing: f64) -> MapDocument {
    let mut ways = Vec::new();
    let mut way_id = u64::from(grid_size) * u64::from(grid_size) + 1;

    let mut link = |a: Cell, b: Cell| {
        ways.push(Way {
            id: way_id.to_string(),
            nodes: vec![
                cells::node_id(a, grid_size).to_string(),
                cells::node_id(b, grid_size).to_string(),
            ],
            tags: vec![(String::from("highway"), String::from(HIGHWAY_CLASS))],
        });
        way_id += 1;
    };

    for y in 0..grid_size {
        for x in 0..grid_size {
            if x + 1 < grid_size {
                link(Cell { x, y }, Cell { x: x + 1, y });
            }
            if y + 1 < grid_size {
                link(Cell { x, y }, Cell { x, y: y + 1 });
            }
        }
    }

    MapDocument {
        generator: GENERATOR_NAME.to_string(),
        nodes: cells::grid_nodes(grid_size, spacing),
        ways,
    }
}
