//! Fixed-size grid of rooms and its text format.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, Doors, Mirror, RoomCoord};

/// Errors raised while constructing or parsing a grid.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The grid text contained no rows.
    #[error("grid input is empty")]
    Empty,
    /// A grid must have at least one row and one column.
    #[error("grid dimensions {width}x{height} must both be at least 1")]
    ZeroDimension {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// The requested dimensions cannot be addressed.
    #[error("grid dimensions {width}x{height} are too large")]
    TooLarge {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A row's length differs from the first row's length.
    #[error("expected row {row} to hold {expected} rooms, but found {found}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A character outside the grid alphabet was encountered.
    #[error("invalid room {found:?} at row {row}, column {column}")]
    InvalidCell {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// Offending character.
        found: char,
    },
    /// The number of cells does not match the dimensions.
    #[error("expected {expected} rooms, but found {found}")]
    CellCount {
        /// Number of rooms implied by the dimensions.
        expected: usize,
        /// Number of cells supplied.
        found: usize,
    },
}

/// Rectangular maze of rooms stored in row-major order.
///
/// Dimensions never change after construction. Rooms are only ever mutated by
/// toggling a mirror's orientation, so the number of mirrors is constant for
/// the lifetime of the grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every room empty.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let rooms = room_capacity(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; rooms],
        })
    }

    /// Creates a grid from row-major cells.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Cell>) -> Result<Self, GridError> {
        let rooms = room_capacity(width, height)?;
        if cells.len() != rooms {
            return Err(GridError::CellCount {
                expected: rooms,
                found: cells.len(),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid from text rows over the `.`, `/` and `\` alphabet.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut expected_width: Option<usize> = None;
        let mut cells = Vec::new();
        let mut height = 0usize;

        for (row_index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let mut row_width = 0usize;
            for (column, symbol) in row.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(GridError::InvalidCell {
                    row: row_index,
                    column,
                    found: symbol,
                })?;
                cells.push(cell);
                row_width += 1;
            }

            match expected_width {
                Some(expected) if expected != row_width => {
                    return Err(GridError::RaggedRow {
                        row: row_index,
                        expected,
                        found: row_width,
                    });
                }
                Some(_) => {}
                None => expected_width = Some(row_width),
            }
            height += 1;
        }

        let width = expected_width.ok_or(GridError::Empty)?;
        let width = u32::try_from(width).map_err(|_| GridError::TooLarge {
            width: u32::MAX,
            height: u32::try_from(height).unwrap_or(u32::MAX),
        })?;
        let height = u32::try_from(height).map_err(|_| GridError::TooLarge {
            width,
            height: u32::MAX,
        })?;

        Self::from_cells(width, height, cells)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of rooms.
    #[must_use]
    pub fn room_count(&self) -> u32 {
        self.width * self.height
    }

    /// Number of rooms holding a mirror.
    #[must_use]
    pub fn mirror_count(&self) -> u32 {
        let count = self.cells.iter().filter(|cell| cell.is_mirror()).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Door numbering for the grid's perimeter.
    #[must_use]
    pub fn doors(&self) -> Doors {
        Doors::from_valid_dimensions(self.width, self.height)
    }

    /// Returns the state of the provided room, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, room: RoomCoord) -> Option<Cell> {
        self.index(room).map(|index| self.cells[index])
    }

    /// Flips the mirror in the provided room and returns its new orientation.
    ///
    /// Empty rooms and rooms outside the grid are left untouched.
    pub fn toggle_mirror(&mut self, room: RoomCoord) -> Option<Mirror> {
        let index = self.index(room)?;
        match self.cells[index] {
            Cell::Empty => None,
            Cell::Mirror(mirror) => {
                let toggled = mirror.toggled();
                self.cells[index] = Cell::Mirror(toggled);
                Some(toggled)
            }
        }
    }

    /// Row-major view of every room.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rooms grouped by row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Renders every row in the grid text format.
    #[must_use]
    pub fn row_strings(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn index(&self, room: RoomCoord) -> Option<usize> {
        if room.row() < self.height && room.column() < self.width {
            let row = usize::try_from(room.row()).ok()?;
            let column = usize::try_from(room.column()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(GridError::Empty);
        }
        Self::from_rows(trimmed.lines().map(str::trim_end))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.row_strings()
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

fn room_capacity(width: u32, height: u32) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::ZeroDimension { width, height });
    }

    let too_large = GridError::TooLarge { width, height };
    let doors = width
        .checked_add(height)
        .and_then(|perimeter| perimeter.checked_mul(2));
    let rooms = width.checked_mul(height);
    match (doors, rooms) {
        (Some(_), Some(rooms)) => usize::try_from(rooms).map_err(|_| too_large),
        _ => Err(too_large),
    }
}
