//! Step-by-step ray traversal with mirror toggling.

use mirror_maze_core::{Cell, DoorNumber, Grid, Position, RayTrace, StepBudget, TraceError};

/// Traces a ray entering through `entry` until it leaves the grid.
///
/// Every mirror the ray passes through reflects it and then flips its
/// orientation, so the grid is left in a different state than it started in
/// and repeated traces from the same door may exit elsewhere. Empty rooms are
/// crossed without any change.
///
/// The trace is abandoned with [`TraceError::DidNotTerminate`] once it has
/// visited more rooms than `budget` allows for the grid. Mirrors toggled before
/// that point stay toggled.
pub fn trace(
    grid: &mut Grid,
    entry: DoorNumber,
    budget: StepBudget,
) -> Result<RayTrace, TraceError> {
    let doors = grid.doors();
    let limit = budget.limit(grid.room_count());
    let start = doors.entry(entry);

    let mut position = Position::from(start.room);
    let mut heading = start.heading;
    let mut reflections = 0u32;
    let mut path = Vec::new();
    let mut steps = 0u64;

    loop {
        let Some(room) = position.room_within(grid.width(), grid.height()) else {
            let exit = doors
                .exit(position)
                .expect("a single step from inside the grid crosses exactly one edge");
            return Ok(RayTrace {
                entry,
                exit,
                reflections,
                path,
            });
        };

        if steps == limit {
            return Err(TraceError::DidNotTerminate { entry, steps });
        }
        steps += 1;
        path.push(room);

        if let Some(Cell::Mirror(mirror)) = grid.cell(room) {
            reflections = reflections.saturating_add(1);
            heading = mirror.reflect(heading);
            let _ = grid.toggle_mirror(room);
        }

        position = position.step(heading);
    }
}
