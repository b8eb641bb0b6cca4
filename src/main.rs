use docopt::Docopt;
use error_chain::bail;
use log::{debug, info};
use origin_shift_mazes::{
    cells::Cartesian2DCoordinate,
    generators::{self, MazeOptions, MazeOptionsBuilder},
    grid::Grid,
    grid_displays::{GridDisplay, PathDisplay, StartEndPointsDisplay, WeightsDisplay},
    pathing::{self, Distances, PathMetric},
    units,
};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io::prelude::*,
    rc::Rc
};

const USAGE: &str = "Origin shift mazes

Usage:
    origin_shift_driver -h | --help
    origin_shift_driver [(--grid-size=<n>|--grid-width=<w> --grid-height=<h>)] [--iterations=<n>] [--seed=<s>] [--weighted] [--show-weights|--show-distances|--show-path|--mark-start-end] [--start-point-x=<x> --start-point-y=<y>] [--end-point-x=<e1> --end-point-y=<e2>] [--random-start-end] [--text-out=<path>] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 6].
    --grid-height=<h>      The grid height in a w*h grid [default: 6].
    --iterations=<n>       Origin shift steps to take. Defaults to width * height * 20.
    --seed=<s>             Seed for the random walk, the same seed gives the same maze.
    --weighted             Give every cell a random weight 0-9 and report weighted path sums.
    --show-weights         Show the weight of every cell.
    --show-distances       Show the distance from the start point to all other points on the grid.
    --show-path            Show the path from the start to the end point.
    --mark-start-end       Draw an 'S' (start) and 'E' (end) to show the path start and end points.
    --start-point-x=<x>    x coordinate of the path start
    --start-point-y=<y>    y coordinate of the path start
    --end-point-x=<e1>     x coordinate of the path end
    --end-point-y=<e2>     y coordinate of the path end
    --random-start-end     Choose distinct random start and end points instead of the longest path.
    --text-out=<path>      Output file path for the textual rendering of the maze.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_iterations: Option<usize>,
    flag_seed: Option<u64>,
    flag_weighted: bool,
    flag_show_weights: bool,
    flag_show_distances: bool,
    flag_show_path: bool,
    flag_mark_start_end: bool,
    flag_start_point_x: Option<u32>,
    flag_start_point_y: Option<u32>,
    flag_end_point_x: Option<u32>,
    flag_end_point_y: Option<u32>,
    flag_random_start_end: bool,
    flag_text_out: String,
    flag_save_edges: String,
}

// `error_chain!` creates the Error, ErrorKind, ResultExt and Result types used by the driver.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Maze(::origin_shift_mazes::errors::MazeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    debug!("driver arguments: {:?}", args);

    let options = maze_options(&args);
    let mut maze_grid = generators::generate(&options)?;
    info!("generated {}x{} maze with {} origin shift steps, origin at {:?}",
          options.width().0,
          options.height().0,
          options.iterations(),
          maze_grid.origin());

    let (start, end) = start_and_end_points(&args, &options, &maze_grid)?;
    let metric = if options.weighted() {
        PathMetric::CellWeights
    } else {
        PathMetric::Hops
    };
    let cost = pathing::shortest_path_cost(&maze_grid, start, end, metric)?
        .ok_or("Generated maze has no path between the start and end points.")?;

    let display = maze_griddisplay(&args, &maze_grid, start, end, metric)?;
    maze_grid.set_grid_display(display);

    let summary = format!("{} from ({}, {}) to ({}, {}): {}",
                          match metric {
                              PathMetric::Hops => "Path length",
                              PathMetric::CellWeights => "Path sum",
                          },
                          start.x,
                          start.y,
                          end.x,
                          end.y,
                          cost);

    if args.flag_text_out.is_empty() {
        println!("{}", maze_grid);
        println!("{}", summary);
    } else {
        write_text_to_file(&format!("{}{}\n", maze_grid, summary), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        info!("wrote maze to {}", args.flag_text_out);
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
        info!("wrote maze passages to {}", args.flag_save_edges);
    }

    Ok(())
}

fn maze_options(args: &MazeArgs) -> MazeOptions {
    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    MazeOptionsBuilder::new(units::Width(width), units::Height(height))
        .iterations(args.flag_iterations)
        .seed(args.flag_seed)
        .weighted(args.flag_weighted)
        .build()
}

/// Explicit points win, then random points if asked for, and the ends of the longest path
/// fill in anything still missing.
fn start_and_end_points(args: &MazeArgs,
                        options: &MazeOptions,
                        maze_grid: &Grid)
                        -> Result<(Cartesian2DCoordinate, Cartesian2DCoordinate)> {

    let explicit_start: Option<Cartesian2DCoordinate> = match (args.flag_start_point_x, args.flag_start_point_y) {
        (Some(x), Some(y)) => Some((x, y).into()),
        _ => None,
    };
    let explicit_end: Option<Cartesian2DCoordinate> = match (args.flag_end_point_x, args.flag_end_point_y) {
        (Some(x), Some(y)) => Some((x, y).into()),
        _ => None,
    };

    let (default_start, default_end) = if args.flag_random_start_end {
        let mut rng = options.placement_rng();
        generators::random_start_and_finish(maze_grid, &mut rng)
    } else {
        let longest_path = pathing::longest_path(maze_grid)
            .ok_or("Generated maze has no longest path.")?;
        match (longest_path.first(), longest_path.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => bail!("Generated maze has an empty longest path."),
        }
    };

    let start = explicit_start.unwrap_or(default_start);
    let end = explicit_end.unwrap_or(default_end);
    for coord in &[start, end] {
        if !maze_grid.is_valid_coordinate(*coord) {
            bail!("Point ({}, {}) is outside the {}x{} maze.",
                  coord.x,
                  coord.y,
                  options.width().0,
                  options.height().0);
        }
    }
    Ok((start, end))
}

/// Decide what goes in the body of each cell when the maze is printed:
/// - the cell weights
/// - distances from the start to every cell
/// - the path between the start and end points
/// - just the start and end markers
fn maze_griddisplay(args: &MazeArgs,
                    maze_grid: &Grid,
                    start: Cartesian2DCoordinate,
                    end: Cartesian2DCoordinate,
                    metric: PathMetric)
                    -> Result<Option<Rc<dyn GridDisplay>>> {

    if args.flag_show_weights {
        return Ok(Some(Rc::new(WeightsDisplay)));
    }

    if args.flag_show_distances || args.flag_show_path {
        let distances = Distances::for_grid(maze_grid, start, metric)?;

        if args.flag_show_distances {
            return Ok(Some(Rc::new(distances)));
        }

        let path = pathing::shortest_path(&distances, end)
            .ok_or("Generated maze has no path between the start and end points.")?;
        return Ok(Some(Rc::new(PathDisplay::new(&path))));
    }

    if args.flag_mark_start_end {
        return Ok(Some(Rc::new(StartEndPointsDisplay::single(Some(start), Some(end)))));
    }

    Ok(None)
}

fn write_text_to_file(data: &str, file_name: &str) -> std::io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let graph = maze_grid.passage_graph();
    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", graph.node_count(), graph.edge_count()));

    for edge in graph.raw_edges() {
        let src_as_1_based_index = edge.source().index() + 1;
        let dst_as_1_based_index = edge.target().index() + 1;
        graph_data.push_str(&format!("{} {}\n", src_as_1_based_index, dst_as_1_based_index));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
