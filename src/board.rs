//! Rectangular flood boards and their conversion to solver graphs.

use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use rand::Rng;
use strum::VariantArray;
use thiserror::Error;

use crate::graph::{Color, Graph};
use crate::location::{Dimension, Location};
use crate::solver::{compute_best_sequence, SolverFailure};

/// Step directions between cells of a square grid.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
pub(crate) enum SquareStep {
    Up,
    Down,
    Left,
    Right,
}

impl SquareStep {
    /// Directions leading to a higher row-major index; walking only these
    /// from every cell enumerates each adjacency exactly once.
    pub(crate) const FORWARD_VARIANTS: &'static [Self] = &[Self::Down, Self::Right];

    pub(crate) fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }
}

/// Reasons a board description may be rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum BoardInvalidReason {
    /// The header did not give positive row and column counts.
    #[error("board header must give positive row and column counts")]
    BadDimensions,
    /// The number of cell labels did not match the dimensions.
    #[error("expected {expected} cells, found {found}")]
    CellCountMismatch {
        /// Cells announced by the header.
        expected: usize,
        /// Cells actually present.
        found: usize,
    },
    /// A cell was not a small nonnegative integer.
    #[error("cell labels must be integers between 0 and 255")]
    BadColorLabel,
    /// Colors must be consecutive integers starting at zero.
    #[error("color {color} is missing from the board")]
    MissingColor {
        /// The absent color.
        color: Color,
    },
    /// The requested flood origin lies outside the board.
    #[error("flood origin lies outside the board")]
    OriginOutOfBounds,
}

/// A rectangular grid of colored cells with a flood origin.
///
/// Boards are parsed from the textual puzzle format or generated randomly,
/// and convert into the root-colored [`Graph`] the solver consumes.
#[derive(Clone, Debug)]
pub struct ColorBoard {
    // width, height
    dims: (Dimension, Dimension),
    cells: Array2<Color>,
    origin: Location,
}

impl ColorBoard {
    /// Parses the textual puzzle format: two whitespace-separated integers
    /// giving rows and columns, followed by one color label per cell in
    /// row-major order. Colors must be consecutive integers starting at 0.
    pub fn parse(input: &str) -> Result<Self, BoardInvalidReason> {
        let mut tokens = input.split_whitespace();
        let rows: usize = tokens
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or(BoardInvalidReason::BadDimensions)?;
        let columns: usize = tokens
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or(BoardInvalidReason::BadDimensions)?;
        if rows == 0 || columns == 0 {
            return Err(BoardInvalidReason::BadDimensions);
        }

        let labels = tokens
            .map(|token| {
                token
                    .parse::<Color>()
                    .map_err(|_| BoardInvalidReason::BadColorLabel)
            })
            .collect::<Result<Vec<Color>, _>>()?;
        if labels.len() != rows * columns {
            return Err(BoardInvalidReason::CellCountMismatch {
                expected: rows * columns,
                found: labels.len(),
            });
        }

        Self::from_cells(Array2::from_shape_vec((rows, columns), labels).unwrap())
    }

    /// Builds a board directly from a cell array, rooted at the top-left
    /// corner.
    pub fn from_cells(cells: Array2<Color>) -> Result<Self, BoardInvalidReason> {
        let (rows, columns) = cells.dim();
        let dims = (
            NonZero::new(columns).ok_or(BoardInvalidReason::BadDimensions)?,
            NonZero::new(rows).ok_or(BoardInvalidReason::BadDimensions)?,
        );

        let board = Self {
            dims,
            cells,
            origin: Location(0, 0),
        };
        board.check_colors()?;
        Ok(board)
    }

    /// Generates a random board with uniformly distributed colors.
    ///
    /// Small boards may miss some color entirely; such boards do not parse
    /// back and cannot be solved, exactly like any other malformed input.
    pub fn generate<R: Rng>(dims: (Dimension, Dimension), num_colors: Color, rng: &mut R) -> Self {
        let cells = Array2::from_shape_simple_fn((dims.1.get(), dims.0.get()), || {
            rng.gen_range(0..num_colors)
        });
        Self {
            dims,
            cells,
            origin: Location(0, 0),
        }
    }

    /// Moves the flood origin, consuming and returning the board.
    pub fn with_origin(mut self, origin: Location) -> Result<Self, BoardInvalidReason> {
        if !self.in_bounds(origin) {
            return Err(BoardInvalidReason::OriginOutOfBounds);
        }
        self.origin = origin;
        Ok(self)
    }

    /// Board dimensions, in `(width, height)` order.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// The flood origin.
    pub fn origin(&self) -> Location {
        self.origin
    }

    /// The cell array, rows first.
    pub fn cells(&self) -> &Array2<Color> {
        &self.cells
    }

    /// Color of the cell at `location`.
    pub fn color(&self, location: Location) -> Color {
        self.cells[location.as_index()]
    }

    /// Number of distinct colors on the board.
    pub fn num_colors(&self) -> usize {
        self.cells
            .iter()
            .copied()
            .max()
            .map_or(0, |max| max as usize + 1)
    }

    /// In-bounds neighbors of `location`, in all step directions.
    pub fn neighbors(&self, location: Location) -> impl Iterator<Item = Location> + '_ {
        SquareStep::VARIANTS
            .iter()
            .map(move |step| step.attempt_from(location))
            .filter(|&neighbor| self.in_bounds(neighbor))
    }

    /// Embeds the board in a colored graph: one node per cell in row-major
    /// order, one edge per 4-connected adjacency, rooted at the origin.
    pub fn to_graph(&self) -> Graph {
        let (width, height) = (self.dims.0.get(), self.dims.1.get());

        let mut adjacency: UnGraphMap<Location, ()> = UnGraphMap::with_capacity(
            width * height,
            (width - 1) * height + (height - 1) * width,
        );
        for y in 0..height {
            for x in 0..width {
                let location = Location(x, y);
                adjacency.add_node(location);
                for step in SquareStep::FORWARD_VARIANTS {
                    let neighbor = step.attempt_from(location);
                    if self.in_bounds(neighbor) {
                        adjacency.add_edge(location, neighbor, ());
                    }
                }
            }
        }

        let mut graph = Graph::new(width * height);
        for (index, &color) in self.cells.indexed_iter() {
            graph.set_color(self.node_index(Location::from(index)), color);
        }
        graph.set_root_index(self.node_index(self.origin));
        for (a, b, _) in adjacency.all_edges() {
            graph.add_edge(self.node_index(a), self.node_index(b));
        }
        graph
    }

    /// Finds a provably shortest flooding sequence for this board.
    ///
    /// Returns according to [`compute_best_sequence`].
    pub fn solve(&self) -> Result<Vec<Color>, SolverFailure> {
        let mut graph = self.to_graph();
        graph.reduce()?;
        compute_best_sequence(&graph)
    }

    fn check_colors(&self) -> Result<(), BoardInvalidReason> {
        let mut present = vec![false; self.num_colors()];
        for &cell in self.cells.iter() {
            present[cell as usize] = true;
        }
        match present.iter().position(|&color_present| !color_present) {
            Some(color) => Err(BoardInvalidReason::MissingColor {
                color: color as Color,
            }),
            None => Ok(()),
        }
    }

    fn node_index(&self, location: Location) -> u32 {
        (location.1 * self.dims.0.get() + location.0) as u32
    }

    fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.dims.0.get() && location.1 < self.dims.1.get()
    }
}

impl Display for ColorBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            for &cell in row {
                write!(f, "{}", char::from_digit(cell as u32, 36).unwrap_or('?'))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
