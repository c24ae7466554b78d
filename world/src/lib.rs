#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Mirror Maze.
//!
//! The world owns the single mutable [`Grid`]. Every mutation, including the
//! mirror toggling performed by a ray, happens inside [`apply`], which reports
//! what happened through [`Event`] values. Consumers read the grid through the
//! [`query`] module.

use log::{debug, warn};
use mirror_maze_core::{Command, Event, Grid, StepBudget};

pub mod tracing;

const DEFAULT_GRID_WIDTH: u32 = 3;
const DEFAULT_GRID_HEIGHT: u32 = 3;

/// Represents the authoritative Mirror Maze world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    step_budget: StepBudget,
    rays_fired: u64,
}

impl World {
    /// Creates a new world holding an empty default-sized grid.
    #[must_use]
    pub fn new() -> Self {
        let grid = match Grid::new(DEFAULT_GRID_WIDTH, DEFAULT_GRID_HEIGHT) {
            Ok(grid) => grid,
            Err(error) => unreachable!("default grid dimensions are valid: {error}"),
        };
        Self::with_grid(grid)
    }

    /// Creates a new world that owns the provided grid.
    #[must_use]
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            step_budget: StepBudget::default(),
            rays_fired: 0,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { grid } => {
            debug!(
                "configuring {}x{} grid with {} mirrors",
                grid.width(),
                grid.height(),
                grid.mirror_count()
            );
            out_events.push(Event::GridConfigured {
                width: grid.width(),
                height: grid.height(),
            });
            world.grid = grid;
        }
        Command::ConfigureStepBudget { budget } => {
            debug!("step budget set to {} per room", budget.steps_per_room());
            world.step_budget = budget;
        }
        Command::FireRay { entry } => {
            world.rays_fired = world.rays_fired.saturating_add(1);
            match tracing::trace(&mut world.grid, entry, world.step_budget) {
                Ok(trace) => {
                    debug!(
                        "ray {} entered door {} and left door {} after {} reflections",
                        world.rays_fired, trace.entry, trace.exit, trace.reflections
                    );
                    out_events.push(Event::RayExited { trace });
                }
                Err(error) => {
                    warn!("ray {} abandoned: {error}", world.rays_fired);
                    out_events.push(Event::RayTrapped { error });
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use mirror_maze_core::{Doors, Grid, StepBudget};

    /// Provides read-only access to the current grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Door numbering for the current grid.
    #[must_use]
    pub fn doors(world: &World) -> Doors {
        world.grid.doors()
    }

    /// Step budget applied to every trace.
    #[must_use]
    pub fn step_budget(world: &World) -> StepBudget {
        world.step_budget
    }

    /// Number of rays fired since the world was created.
    #[must_use]
    pub fn rays_fired(world: &World) -> u64 {
        world.rays_fired
    }
}
