#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mirror Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. The grid itself, the door
//! numbering scheme and the mirror reflection table live here so every crate
//! agrees on them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod doors;
mod grid;

pub use doors::{Doors, Entry, Side};
pub use grid::{Grid, GridError};

/// Number of consecutive attempts fired through every door during a difficulty analysis.
pub const ATTEMPTS_PER_DOOR: u32 = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the world's grid with the provided one.
    ConfigureGrid {
        /// Grid that becomes the authoritative maze layout.
        grid: Grid,
    },
    /// Updates the step budget applied to every subsequent trace.
    ConfigureStepBudget {
        /// Budget bounding the number of rooms a single trace may visit.
        budget: StepBudget,
    },
    /// Fires a ray through the provided door, toggling every mirror it passes.
    FireRay {
        /// Door the ray enters through.
        entry: DoorNumber,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new grid became authoritative.
    GridConfigured {
        /// Number of columns in the configured grid.
        width: u32,
        /// Number of rows in the configured grid.
        height: u32,
    },
    /// Reports a ray that left the grid through a perimeter door.
    RayExited {
        /// Complete record of the traversal.
        trace: RayTrace,
    },
    /// Reports a ray that exhausted its step budget without leaving the grid.
    RayTrapped {
        /// Failure describing the abandoned trace.
        error: TraceError,
    },
}

/// One-based identifier of a perimeter door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoorNumber(u32);

impl DoorNumber {
    /// Creates a door number from its one-based value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the one-based numeric value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DoorNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a single room expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomCoord {
    row: u32,
    column: u32,
}

impl RoomCoord {
    /// Creates a new room coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index, counted from the top.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index, counted from the left.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Signed position that may lie just outside the grid while a ray leaves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    row: i64,
    column: i64,
}

impl Position {
    /// Creates a position from signed row and column indices.
    #[must_use]
    pub const fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// Signed row index.
    #[must_use]
    pub const fn row(&self) -> i64 {
        self.row
    }

    /// Signed column index.
    #[must_use]
    pub const fn column(&self) -> i64 {
        self.column
    }

    /// Returns the neighbouring position one room away in the provided direction.
    #[must_use]
    pub const fn step(self, heading: Direction) -> Self {
        let (row_delta, column_delta) = heading.delta();
        Self {
            row: self.row + row_delta,
            column: self.column + column_delta,
        }
    }

    /// Converts the position into a room coordinate when it lies inside a
    /// `width × height` grid.
    #[must_use]
    pub fn room_within(self, width: u32, height: u32) -> Option<RoomCoord> {
        let row = u32::try_from(self.row).ok()?;
        let column = u32::try_from(self.column).ok()?;
        (row < height && column < width).then_some(RoomCoord::new(row, column))
    }
}

impl From<RoomCoord> for Position {
    fn from(room: RoomCoord) -> Self {
        Self::new(i64::from(room.row()), i64::from(room.column()))
    }
}

/// Cardinal travel directions available to a ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Row and column deltas applied when advancing one room.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

/// Orientation of a two-sided mirror occupying a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mirror {
    /// `/`, leaning with ends in the top-right and bottom-left corners.
    Forward,
    /// `\`, leaning with ends in the top-left and bottom-right corners.
    Backward,
}

/// Outgoing direction keyed by mirror and incoming direction.
///
/// Rows follow [`Mirror`] order, columns follow [`Direction`] order
/// (north, east, south, west).
const REFLECTIONS: [[Direction; 4]; 2] = [
    [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ],
    [
        Direction::West,
        Direction::South,
        Direction::East,
        Direction::North,
    ],
];

impl Mirror {
    /// Direction a ray travels after bouncing off the mirror.
    #[must_use]
    pub const fn reflect(self, heading: Direction) -> Direction {
        REFLECTIONS[self.index()][heading.index()]
    }

    /// Orientation the mirror assumes after a ray passes through it.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Character used for the mirror in the grid text format.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Forward => '/',
            Self::Backward => '\\',
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
        }
    }
}

/// State of a single room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Room without a mirror; rays pass straight through.
    #[default]
    Empty,
    /// Room holding a mirror in the given orientation.
    Mirror(Mirror),
}

impl Cell {
    /// Character used for the cell in the grid text format.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Mirror(mirror) => mirror.symbol(),
        }
    }

    /// Parses a cell from its grid text character.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Empty),
            '/' => Some(Self::Mirror(Mirror::Forward)),
            '\\' => Some(Self::Mirror(Mirror::Backward)),
            _ => None,
        }
    }

    /// Reports whether the room holds a mirror.
    #[must_use]
    pub const fn is_mirror(self) -> bool {
        matches!(self, Self::Mirror(_))
    }
}

/// Upper bound on the number of rooms a single trace may visit.
///
/// The limit scales with the grid: a trace over `rooms` rooms may take at most
/// `per_room × rooms` steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepBudget {
    per_room: u32,
}

impl StepBudget {
    /// Per-room allowance used when no budget is configured.
    pub const DEFAULT_PER_ROOM: u32 = 64;

    /// Creates a budget granting `per_room` steps for every room in the grid.
    #[must_use]
    pub const fn per_room(per_room: u32) -> Self {
        Self { per_room }
    }

    /// Steps granted per room.
    #[must_use]
    pub const fn steps_per_room(&self) -> u32 {
        self.per_room
    }

    /// Total number of steps allowed for a grid with the provided room count.
    ///
    /// Never returns zero, so the entry room can always be visited.
    #[must_use]
    pub fn limit(&self, rooms: u32) -> u64 {
        (u64::from(self.per_room) * u64::from(rooms)).max(1)
    }
}

impl Default for StepBudget {
    fn default() -> Self {
        Self::per_room(Self::DEFAULT_PER_ROOM)
    }
}

/// Complete record of one ray traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RayTrace {
    /// Door the ray entered through.
    pub entry: DoorNumber,
    /// Door the ray left through.
    pub exit: DoorNumber,
    /// Number of mirrors the ray bounced off.
    pub reflections: u32,
    /// Rooms visited in traversal order, entry room first.
    pub path: Vec<RoomCoord>,
}

/// Failures raised while tracing a ray.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TraceError {
    /// The ray visited more rooms than the configured budget allows.
    #[error("ray entering through door {entry} did not leave the grid within {steps} steps")]
    DidNotTerminate {
        /// Door the ray entered through.
        entry: DoorNumber,
        /// Number of steps taken before the trace was abandoned.
        steps: u64,
    },
}

impl TraceError {
    /// Door the failed ray entered through.
    #[must_use]
    pub const fn entry(&self) -> DoorNumber {
        match self {
            Self::DidNotTerminate { entry, .. } => *entry,
        }
    }
}

/// Outcome of one attempt fired during a difficulty analysis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExplorationRecord {
    /// Door the ray entered through.
    pub door: DoorNumber,
    /// One-based attempt index for the door.
    pub attempt: u32,
    /// Door the ray left through.
    pub exit_door: DoorNumber,
    /// Reflections counted during the attempt.
    pub reflections: u32,
    /// Grid captured right after the attempt finished.
    pub grid_state: Grid,
}

/// Aggregated difficulty statistics for a single maze.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DifficultyReport {
    /// Grid captured before any ray was fired.
    pub initial_config: Grid,
    /// Number of rooms in the grid.
    pub room_count: u32,
    /// Number of rooms holding a mirror.
    pub mirror_count: u32,
    /// Share of rooms holding a mirror, in percent, rounded to two decimals.
    pub mirror_percentage: f64,
    /// Sum of reflections across every attempt.
    pub total_reflections: u64,
    /// Per-attempt records in firing order.
    pub exploration_results: Vec<ExplorationRecord>,
}
