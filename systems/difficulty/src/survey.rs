//! One-pass path survey: every door traced once, in door order.

use log::info;
use mirror_maze_core::{Command, Event, RayTrace};
use mirror_maze_world::{self as world, query, World};

use crate::AnalysisError;

/// Fires a single ray through every door of the world's grid in door order.
///
/// The rays share the world's grid, so mirrors flipped by one door are seen
/// by the next. The returned traces include the visited rooms of each ray.
pub fn survey(world: &mut World) -> Result<Vec<RayTrace>, AnalysisError> {
    let doors = query::doors(world);
    let mut traces = Vec::with_capacity(doors.count() as usize);
    let mut events = Vec::new();

    for door in doors.iter() {
        events.clear();
        world::apply(world, Command::FireRay { entry: door }, &mut events);

        let outcome = events.drain(..).find_map(|event| match event {
            Event::RayExited { trace } if trace.entry == door => Some(Ok(trace)),
            Event::RayTrapped { error } if error.entry() == door => {
                Some(Err(AnalysisError::Trace {
                    door,
                    attempt: 1,
                    source: error,
                }))
            }
            _ => None,
        });

        match outcome {
            Some(Ok(trace)) => traces.push(trace),
            Some(Err(error)) => return Err(error),
            None => return Err(AnalysisError::MissingOutcome { door, attempt: 1 }),
        }
    }

    info!("surveyed {} doors", traces.len());
    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_maze_core::{DoorNumber, RoomCoord, StepBudget, TraceError};

    #[test]
    fn surveys_every_door_once_in_order() {
        let mut world = World::new();

        let traces = survey(&mut world).expect("survey completes");

        let entries: Vec<u32> = traces.iter().map(|trace| trace.entry.get()).collect();
        assert_eq!(entries, (1..=12).collect::<Vec<_>>());
        assert_eq!(traces[0].exit, DoorNumber::new(9));
        assert_eq!(
            traces[3].path,
            vec![
                RoomCoord::new(2, 2),
                RoomCoord::new(2, 1),
                RoomCoord::new(2, 0)
            ]
        );
        assert_eq!(query::rays_fired(&world), 12);
    }

    #[test]
    fn trapped_ray_stops_the_survey() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureStepBudget {
                budget: StepBudget::per_room(0),
            },
            &mut events,
        );

        let error = survey(&mut world).expect_err("budget too small");

        assert_eq!(
            error,
            AnalysisError::Trace {
                door: DoorNumber::new(1),
                attempt: 1,
                source: TraceError::DidNotTerminate {
                    entry: DoorNumber::new(1),
                    steps: 1
                }
            }
        );
        assert_eq!(query::rays_fired(&world), 1);
    }
}
