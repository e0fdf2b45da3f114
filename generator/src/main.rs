mod cells;
mod grid;
mod maze;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use route_graph::RouteGraph;
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Parser, Debug)]
struct Args {
    /// Grid layout to generate
    #[arg(short, long, value_enum, default_value = "maze")]
    layout: Layout,

    /// Number of cells along each axis
    #[arg(short, long, default_value_t = 30)]
    grid_size: u32,

    /// Spacing between adjacent cells, in degrees before scaling
    #[arg(short, long, default_value_t = 1e-5)]
    spacing: f64,

    /// Seed for the maze layout and its way ids
    #[arg(long, default_value_t = 7489)]
    seed: u64,

    /// Where to write the map
    #[arg(short, long)]
    output: PathBuf,

    /// Also decode the generated map and write its routing graph as JSON
    #[arg(long)]
    graph_json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    Maze,
    FullGrid,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let map = match args.layout {
        Layout::Maze => maze::generate(args.grid_size, args.spacing, args.seed),
        Layout::FullGrid => grid::generate(args.grid_size, args.spacing),
    };

    let xml = map.to_xml()?;
    write_file(&args.output, xml.as_bytes())?;

    if let Some(path) = &args.graph_json {
        let graph = RouteGraph::from_map(&map);
        let f = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        serde_json::to_writer(f, &graph)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    f.write_all(contents)
        .with_context(|| format!("failed to write {}", path.display()))
}
