#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic difficulty analysis that fires repeated rays through every door.
//!
//! The analysis never mutates the grid itself. It emits [`Command::FireRay`]
//! requests one at a time, the world applies them against its single grid,
//! and the resulting events are fed back through [`DifficultyAnalysis::handle`]
//! together with the grid as it stands after the attempt. Because mirrors keep
//! their toggled orientation between attempts, the firing order is part of the
//! result: door 1 attempts 1 to 3, then door 2 attempts 1 to 3, and so on.

use log::info;
use mirror_maze_core::{
    Command, DifficultyReport, DoorNumber, Doors, Event, ExplorationRecord, Grid, TraceError,
    ATTEMPTS_PER_DOOR,
};
use mirror_maze_world::{self as world, query, World};
use thiserror::Error;

mod survey;

pub use survey::survey;

/// Failures that abort a difficulty analysis or path survey.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// A ray did not leave the grid within the step budget.
    #[error("attempt {attempt} through door {door} failed")]
    Trace {
        /// Door the failed ray entered through.
        door: DoorNumber,
        /// One-based attempt index of the failed ray.
        attempt: u32,
        /// Underlying trace failure.
        #[source]
        source: TraceError,
    },
    /// Firing a ray produced no outcome event.
    #[error("attempt {attempt} through door {door} produced no outcome")]
    MissingOutcome {
        /// Door the ray was fired through.
        door: DoorNumber,
        /// One-based attempt index.
        attempt: u32,
    },
    /// The report was requested before every attempt completed.
    #[error("analysis finished after {completed} of {expected} attempts")]
    Incomplete {
        /// Attempts recorded so far.
        completed: usize,
        /// Attempts required for a full report.
        expected: usize,
    },
}

/// Door and attempt index of a single ray fired during the analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trial {
    /// Door the ray enters through.
    pub door: DoorNumber,
    /// One-based attempt index for the door.
    pub attempt: u32,
}

/// Pure system that schedules every attempt and accumulates the report.
#[derive(Debug)]
pub struct DifficultyAnalysis {
    initial: Grid,
    doors: Doors,
    pending: Option<Trial>,
    total_reflections: u64,
    records: Vec<ExplorationRecord>,
}

impl DifficultyAnalysis {
    /// Starts an analysis of the provided grid, capturing it as the initial snapshot.
    #[must_use]
    pub fn new(initial: &Grid) -> Self {
        let doors = initial.doors();
        let expected = expected_trials(&doors);
        Self {
            initial: initial.clone(),
            doors,
            pending: Some(Trial {
                door: DoorNumber::new(1),
                attempt: 1,
            }),
            total_reflections: 0,
            records: Vec::with_capacity(expected),
        }
    }

    /// Attempt that the next command fires, if any remain.
    #[must_use]
    pub fn pending(&self) -> Option<Trial> {
        self.pending
    }

    /// Command that fires the pending attempt.
    #[must_use]
    pub fn next_command(&self) -> Option<Command> {
        self.pending
            .map(|trial| Command::FireRay { entry: trial.door })
    }

    /// Number of attempts recorded so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.records.len()
    }

    /// Reports whether every attempt has been recorded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_none()
    }

    /// Consumes world events and the post-attempt grid to record the pending attempt.
    ///
    /// Only outcomes for the pending door are considered; everything else is
    /// ignored. A trapped ray aborts the analysis.
    pub fn handle(&mut self, events: &[Event], grid: &Grid) -> Result<(), AnalysisError> {
        for event in events {
            let Some(trial) = self.pending else {
                return Ok(());
            };

            match event {
                Event::RayExited { trace } if trace.entry == trial.door => {
                    self.total_reflections += u64::from(trace.reflections);
                    self.records.push(ExplorationRecord {
                        door: trial.door,
                        attempt: trial.attempt,
                        exit_door: trace.exit,
                        reflections: trace.reflections,
                        grid_state: grid.clone(),
                    });
                    self.pending = self.advance(trial);
                }
                Event::RayTrapped { error } if error.entry() == trial.door => {
                    return Err(AnalysisError::Trace {
                        door: trial.door,
                        attempt: trial.attempt,
                        source: error.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Produces the report once every attempt has been recorded.
    pub fn finish(self) -> Result<DifficultyReport, AnalysisError> {
        let expected = expected_trials(&self.doors);
        if !self.is_complete() {
            return Err(AnalysisError::Incomplete {
                completed: self.records.len(),
                expected,
            });
        }

        let room_count = self.initial.room_count();
        let mirror_count = self.initial.mirror_count();
        Ok(DifficultyReport {
            mirror_percentage: mirror_percentage(mirror_count, room_count),
            initial_config: self.initial,
            room_count,
            mirror_count,
            total_reflections: self.total_reflections,
            exploration_results: self.records,
        })
    }

    fn advance(&self, trial: Trial) -> Option<Trial> {
        if trial.attempt < ATTEMPTS_PER_DOOR {
            return Some(Trial {
                door: trial.door,
                attempt: trial.attempt + 1,
            });
        }

        let next_door = trial.door.get() + 1;
        (next_door <= self.doors.count()).then(|| Trial {
            door: DoorNumber::new(next_door),
            attempt: 1,
        })
    }
}

/// Runs a full difficulty analysis against the world's grid.
///
/// The world's grid is left in the state produced by the final attempt.
pub fn analyze(world: &mut World) -> Result<DifficultyReport, AnalysisError> {
    let mut analysis = DifficultyAnalysis::new(query::grid(world));
    let mut events = Vec::new();

    while let (Some(trial), Some(command)) = (analysis.pending(), analysis.next_command()) {
        events.clear();
        world::apply(world, command, &mut events);
        analysis.handle(&events, query::grid(world))?;

        if analysis.pending() == Some(trial) {
            return Err(AnalysisError::MissingOutcome {
                door: trial.door,
                attempt: trial.attempt,
            });
        }
    }

    let attempts = analysis.completed();
    let report = analysis.finish()?;
    info!(
        "analysed {} rooms with {} mirrors: {} reflections over {} attempts, {} steps per room",
        report.room_count,
        report.mirror_count,
        report.total_reflections,
        attempts,
        query::step_budget(world).steps_per_room()
    );
    Ok(report)
}

fn expected_trials(doors: &Doors) -> usize {
    doors.count() as usize * ATTEMPTS_PER_DOOR as usize
}

fn mirror_percentage(mirror_count: u32, room_count: u32) -> f64 {
    if room_count == 0 {
        return 0.0;
    }
    let share = f64::from(mirror_count) / f64::from(room_count) * 100.0;
    (share * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_maze_core::RayTrace;

    fn grid(text: &str) -> Grid {
        text.parse().expect("grid parses")
    }

    fn exited(entry: u32, exit: u32, reflections: u32) -> Event {
        Event::RayExited {
            trace: RayTrace {
                entry: DoorNumber::new(entry),
                exit: DoorNumber::new(exit),
                reflections,
                path: Vec::new(),
            },
        }
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(mirror_percentage(1, 3), 33.33);
        assert_eq!(mirror_percentage(2, 3), 66.67);
        assert_eq!(mirror_percentage(0, 9), 0.0);
        assert_eq!(mirror_percentage(4, 4), 100.0);
    }

    #[test]
    fn schedules_three_attempts_per_door_in_order() {
        let grid = grid("..");
        let mut analysis = DifficultyAnalysis::new(&grid);
        let mut fired = Vec::new();

        while let Some(Command::FireRay { entry }) = analysis.next_command() {
            let trial = analysis.pending().expect("pending trial");
            fired.push((entry.get(), trial.attempt));
            analysis
                .handle(&[exited(entry.get(), 1, 0)], &grid)
                .expect("outcome accepted");
        }

        let expected: Vec<(u32, u32)> = (1..=6)
            .flat_map(|door| (1..=3).map(move |attempt| (door, attempt)))
            .collect();
        assert_eq!(fired, expected);
        assert!(analysis.is_complete());
    }

    #[test]
    fn ignores_outcomes_for_other_doors() {
        let grid = grid(".");
        let mut analysis = DifficultyAnalysis::new(&grid);

        analysis
            .handle(
                &[Event::GridConfigured {
                    width: 1,
                    height: 1,
                }],
                &grid,
            )
            .expect("unrelated event ignored");
        analysis
            .handle(&[exited(3, 1, 0)], &grid)
            .expect("foreign outcome ignored");

        assert_eq!(analysis.completed(), 0);
        assert_eq!(
            analysis.pending(),
            Some(Trial {
                door: DoorNumber::new(1),
                attempt: 1
            })
        );
    }

    #[test]
    fn trapped_ray_aborts_the_analysis() {
        let grid = grid(".");
        let mut analysis = DifficultyAnalysis::new(&grid);
        let error = TraceError::DidNotTerminate {
            entry: DoorNumber::new(1),
            steps: 64,
        };

        let result = analysis.handle(
            &[Event::RayTrapped {
                error: error.clone(),
            }],
            &grid,
        );

        assert_eq!(
            result,
            Err(AnalysisError::Trace {
                door: DoorNumber::new(1),
                attempt: 1,
                source: error
            })
        );
    }

    #[test]
    fn finishing_early_is_rejected() {
        let grid = grid(".");
        let mut analysis = DifficultyAnalysis::new(&grid);
        analysis
            .handle(&[exited(1, 3, 0)], &grid)
            .expect("outcome accepted");

        assert_eq!(
            analysis.finish(),
            Err(AnalysisError::Incomplete {
                completed: 1,
                expected: 12
            })
        );
    }
}
