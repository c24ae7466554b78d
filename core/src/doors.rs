//! Perimeter door numbering.
//!
//! Doors are numbered from one in four contiguous runs that circle the grid
//! counter-clockwise: the bottom edge left to right, the right edge bottom to
//! top, the top edge right to left and finally the left edge top to bottom.
//! Every door corresponds to exactly one boundary crossing and one inward
//! direction.

use crate::{Direction, DoorNumber, Position, RoomCoord};

/// Edge of the grid a door is carved into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Doors below the last row.
    Bottom,
    /// Doors right of the last column.
    Right,
    /// Doors above the first row.
    Top,
    /// Doors left of the first column.
    Left,
}

/// Room and heading of a ray that just entered through a door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    /// First room the ray visits.
    pub room: RoomCoord,
    /// Direction the ray travels on entry.
    pub heading: Direction,
}

/// Door numbering for a `width × height` grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Doors {
    width: u32,
    height: u32,
}

impl Doors {
    pub(crate) const fn from_valid_dimensions(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of doors around the perimeter.
    #[must_use]
    pub const fn count(&self) -> u32 {
        2 * (self.width + self.height)
    }

    /// Every door in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DoorNumber> {
        (1..=self.count()).map(DoorNumber::new)
    }

    /// Resolves the room and heading of a ray entering through `door`.
    ///
    /// Door numbers outside `1..=count` wrap around the perimeter, so door
    /// `count + 1` behaves like door 1 and door 0 like the last door.
    #[must_use]
    pub fn entry(&self, door: DoorNumber) -> Entry {
        let (w, h) = (self.width, self.height);
        let d = self.internal(door);

        if d < w {
            Entry {
                room: RoomCoord::new(h - 1, d),
                heading: Direction::North,
            }
        } else if d < w + h {
            Entry {
                room: RoomCoord::new(h - 1 - (d - w), w - 1),
                heading: Direction::West,
            }
        } else if d < 2 * w + h {
            Entry {
                room: RoomCoord::new(0, w - 1 - (d - w - h)),
                heading: Direction::South,
            }
        } else {
            Entry {
                room: RoomCoord::new(d - 2 * w - h, 0),
                heading: Direction::East,
            }
        }
    }

    /// Resolves the door a ray leaves through after stepping onto `position`.
    ///
    /// Returns `None` when the position still lies inside the grid or sits
    /// diagonally beyond a corner, which a single step can never reach.
    #[must_use]
    pub fn exit(&self, position: Position) -> Option<DoorNumber> {
        let w = i64::from(self.width);
        let h = i64::from(self.height);
        let (row, column) = (position.row(), position.column());

        let internal = (if row < 0 {
            (0..w).contains(&column).then(|| w + h + (w - column - 1))
        } else if row >= h {
            (0..w).contains(&column).then_some(column)
        } else if column < 0 {
            Some(2 * w + h + row)
        } else if column >= w {
            Some(w + (h - row - 1))
        } else {
            None
        })?;

        u32::try_from(internal + 1).ok().map(DoorNumber::new)
    }

    /// Edge the door is carved into, after wrapping out-of-range numbers.
    #[must_use]
    pub fn side(&self, door: DoorNumber) -> Side {
        let (w, h) = (self.width, self.height);
        let d = self.internal(door);
        if d < w {
            Side::Bottom
        } else if d < w + h {
            Side::Right
        } else if d < 2 * w + h {
            Side::Top
        } else {
            Side::Left
        }
    }

    /// Door beyond the room on the provided edge of the grid.
    ///
    /// `offset` is the column for top and bottom doors and the row for left and
    /// right doors.
    #[must_use]
    pub fn door_at(&self, side: Side, offset: u32) -> Option<DoorNumber> {
        let offset = i64::from(offset);
        let position = match side {
            Side::Bottom => Position::new(i64::from(self.height), offset),
            Side::Right => Position::new(offset, i64::from(self.width)),
            Side::Top => Position::new(-1, offset),
            Side::Left => Position::new(offset, -1),
        };
        let inside_edge = match side {
            Side::Bottom | Side::Top => offset < i64::from(self.width),
            Side::Right | Side::Left => offset < i64::from(self.height),
        };
        if inside_edge {
            self.exit(position)
        } else {
            None
        }
    }

    fn internal(&self, door: DoorNumber) -> u32 {
        let total = i64::from(self.count());
        let wrapped = (i64::from(door.get()) - 1).rem_euclid(total);
        // rem_euclid keeps the value within 0..total.
        u32::try_from(wrapped).unwrap_or(0)
    }
}
