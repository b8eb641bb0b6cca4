use std::fmt;

use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, CoordinateSmallVec};
use crate::grid::Grid;
use crate::pathing::Distances;
use crate::utils::FnvHashSet;

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: &Grid, _: Cartesian2DCoordinate) -> String {
        String::from("   ")
    }
}

impl GridDisplay for Distances {
    fn render_cell_body(&self, _: &Grid, coord: Cartesian2DCoordinate) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

/// Shows each cell's arithmetic weight.
#[derive(Debug, Copy, Clone)]
pub struct WeightsDisplay;

impl GridDisplay for WeightsDisplay {
    fn render_cell_body(&self, grid: &Grid, coord: Cartesian2DCoordinate) -> String {
        grid.weight(coord).map_or_else(|| String::from("   "), |w| format!(" {} ", w))
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<Cartesian2DCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[Cartesian2DCoordinate]) -> Self {
        PathDisplay { on_path_coordinates: path.iter().cloned().collect() }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, _: &Grid, coord: Cartesian2DCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: CoordinateSmallVec,
    end_coordinates: CoordinateSmallVec,
}
impl StartEndPointsDisplay {
    pub fn new(starts: CoordinateSmallVec, ends: CoordinateSmallVec) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }

    pub fn single(start: Option<Cartesian2DCoordinate>,
                  end: Option<Cartesian2DCoordinate>)
                  -> StartEndPointsDisplay {
        let as_smallvec = |coord: Option<Cartesian2DCoordinate>| -> CoordinateSmallVec {
            coord.into_iter().collect::<SmallVec<_>>()
        };
        StartEndPointsDisplay::new(as_smallvec(start), as_smallvec(end))
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, _: &Grid, coord: Cartesian2DCoordinate) -> String {

        let contains_coordinate =
            |coordinates: &CoordinateSmallVec| coordinates.iter().any(|&c| c == coord);

        if contains_coordinate(&self.start_coordinates) {
            String::from(" S ")
        } else if contains_coordinate(&self.end_coordinates) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

// Walls are drawn wherever two neighbouring cells are not connected, plus the outer boundary.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";
        let default_cell_body = String::from("   ");

        let columns_count = self.columns().0;
        let rows_count = self.rows().0;

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(WALL_RD);
        if let Some(first_grid_row) = self.iter_row().next() {
            for (index, coord) in first_grid_row.iter().enumerate() {
                output.push_str(WALL_LR_3);
                let is_east_open = self.is_neighbour_linked(*coord, CompassPrimary::East);
                if is_east_open {
                    output.push_str(WALL_LR);
                } else {
                    let is_last_cell = index == (columns_count - 1);
                    if is_last_cell {
                        output.push_str(WALL_LD);
                    } else {
                        output.push_str(WALL_LRD);
                    }
                }
            }
        }
        output.push('\n');

        for (index_row, row) in self.iter_row().enumerate() {

            let is_last_row = index_row == (rows_count - 1);

            // The top section of each cell is done by the previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for (index_column, cell_coord) in row.into_iter().enumerate() {

                let render_cell_side = |direction, passage_clear_text, blocking_wall_text| {
                    if self.is_neighbour_linked(cell_coord, direction) {
                        passage_clear_text
                    } else {
                        blocking_wall_text
                    }
                };
                let is_first_column = index_column == 0;
                let is_last_column = index_column == (columns_count - 1);
                let east_open = self.is_neighbour_linked(cell_coord, CompassPrimary::East);
                let south_open = self.is_neighbour_linked(cell_coord, CompassPrimary::South);

                // Each cell uses the southern wall of the cell above as its northern wall, so
                // only the body, the eastern boundary and the southern boundary are drawn here.
                let east_boundary = render_cell_side(CompassPrimary::East, " ", WALL_UD);

                if let Some(ref displayer) = *self.grid_display() {
                    row_middle_section_render.push_str(displayer.render_cell_body(self, cell_coord)
                        .as_str());
                } else {
                    row_middle_section_render.push_str(default_cell_body.as_str());
                }

                row_middle_section_render.push_str(east_boundary);

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                let south_boundary = render_cell_side(CompassPrimary::South, "   ", WALL_LR_3);
                row_bottom_section_render.push_str(south_boundary);

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let access_se_from_east =
                            self.neighbour_at_direction(cell_coord, CompassPrimary::East)
                                .map_or(false,
                                        |c| self.is_neighbour_linked(c, CompassPrimary::South));
                        let access_se_from_south =
                            self.neighbour_at_direction(cell_coord, CompassPrimary::South)
                                .map_or(false,
                                        |c| self.is_neighbour_linked(c, CompassPrimary::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
