//! Randomized spanning-tree maze layout.

use common::{MapDocument, Way};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::cells::{self, Cell};

pub const GENERATOR_NAME: &str = "prim_maze_grid";

const HIGHWAY_CLASS: &str = "residential";

/// Build a maze map: one node per cell and a spanning tree of ways rooted
/// at cell (0,0), so exactly one simple path exists between any two cells.
///
/// Frontier expansion picks a candidate edge uniformly at random from a
/// shrinking pool; candidates whose far endpoint was already reached are
/// discarded, which is what keeps the committed edge set acyclic. A fixed
/// seed reproduces the committed edges and their discovery order.
pub fn generate(grid_size: u32, spacing: f64, seed: u64) -> MapDocument {
    let mut rng = StdRng::seed_from_u64(seed);
    let cell_count = (grid_size * grid_size) as usize;
    if cell_count == 0 {
        return MapDocument {
            generator: GENERATOR_NAME.to_string(),
            nodes: Vec::new(),
            ways: Vec::new(),
        };
    }

    let mut visited = vec![false; cell_count];
    let start = Cell { x: 0, y: 0 };
    visited[cells::index(start, grid_size)] = true;

    let mut frontier: Vec<(Cell, Cell)> = cells::neighbors(start, grid_size)
        .into_iter()
        .map(|neighbor| (start, neighbor))
        .collect();
    let mut committed = Vec::with_capacity(cell_count.saturating_sub(1));

    while !frontier.is_empty() {
        let pick = rng.gen_range(0..frontier.len());
        let (near, far) = frontier.swap_remove(pick);

        if visited[cells::index(far, grid_size)] {
            continue;
        }
        visited[cells::index(far, grid_size)] = true;
        committed.push((near, far));

        for neighbor in cells::neighbors(far, grid_size) {
            if !visited[cells::index(neighbor, grid_size)] {
                frontier.push((far, neighbor));
            }
        }
    }

    let ways = committed
        .into_iter()
        .map(|(near, far)| Way {
            // Random ids from a wide range; collisions are tolerated, the
            // decoder never indexes ways by id
            id: rng.gen_range(100_000..=999_999u64).to_string(),
            nodes: vec![
                cells::node_id(near, grid_size).to_string(),
                cells::node_id(far, grid_size).to_string(),
            ],
            tags: vec![(String::from("highway"), String::from(HIGHWAY_CLASS))],
        })
        .collect();

    MapDocument {
        generator: GENERATOR_NAME.to_string(),
        nodes: cells::grid_nodes(grid_size, spacing),
        ways,
    }
}
