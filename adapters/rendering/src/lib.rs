#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text, JSON and CSV presentation of Mirror Maze results.

use std::fmt::{self, Write as _};

use anyhow::{Context, Result as AnyResult};
use mirror_maze_core::{DifficultyReport, Grid, RayTrace, Side, ATTEMPTS_PER_DOOR};
use serde::Serialize;

/// Header line of the CSV output.
pub const CSV_HEADER: &str = "mirror_count,mirror_percentage,total_reflections";

/// Separator printed between analysed mazes in text output.
pub const SEPARATOR: &str = "--------------------------------------------------";

/// Grid display that surrounds the rooms with their door numbers.
///
/// Top doors run right to left above the grid, left doors top to bottom,
/// right doors bottom to top and bottom doors left to right below the grid.
#[derive(Clone, Copy, Debug)]
pub struct LabelledGrid<'a> {
    grid: &'a Grid,
}

impl<'a> LabelledGrid<'a> {
    /// Wraps the grid for display.
    #[must_use]
    pub const fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }
}

impl fmt::Display for LabelledGrid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doors = self.grid.doors();
        let label = |side, offset| doors.door_at(side, offset).map_or(0, |door| door.get());

        f.write_str("  ")?;
        for column in 0..self.grid.width() {
            write!(f, " {:>2}", label(Side::Top, column))?;
        }
        writeln!(f)?;

        for (row, cells) in (0u32..).zip(self.grid.rows()) {
            write!(f, "{:>2} ", label(Side::Left, row))?;
            for cell in cells {
                write!(f, " {} ", cell.symbol())?;
            }
            writeln!(f, "{:>2}", label(Side::Right, row))?;
        }

        f.write_str("  ")?;
        for column in 0..self.grid.width() {
            write!(f, " {:>2}", label(Side::Bottom, column))?;
        }
        Ok(())
    }
}

/// Renders the human readable summary of a difficulty report.
///
/// Verbose output lists every attempt and shows the grid after the last
/// attempt of each door.
#[must_use]
pub fn render_text(report: &DifficultyReport, verbose: bool) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, report, verbose);
    out
}

fn write_text(out: &mut String, report: &DifficultyReport, verbose: bool) -> fmt::Result {
    let grid = &report.initial_config;
    writeln!(out, "Initial configuration:")?;
    writeln!(out, "{}", LabelledGrid::new(grid))?;
    writeln!(out)?;
    writeln!(out, "Maze size: {}x{}", grid.width(), grid.height())?;
    writeln!(out, "Rooms: {}", report.room_count)?;
    writeln!(out, "Mirrors: {}", report.mirror_count)?;
    writeln!(out, "Mirror share: {:.2}%", report.mirror_percentage)?;
    writeln!(out, "Total reflections: {}", report.total_reflections)?;

    if !verbose {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "Exploration results:")?;
    for record in &report.exploration_results {
        writeln!(
            out,
            "Door {} attempt {}: exit {} (reflections: {})",
            record.door, record.attempt, record.exit_door, record.reflections
        )?;
        if record.attempt == ATTEMPTS_PER_DOOR {
            writeln!(out, "  Grid after exploration:")?;
            writeln!(out, "{}", LabelledGrid::new(&record.grid_state))?;
        }
    }
    Ok(())
}

/// Serialises a difficulty report as a single-line JSON document.
pub fn render_json(report: &DifficultyReport) -> AnyResult<String> {
    serde_json::to_string(report).context("failed to serialise difficulty report")
}

/// Renders the CSV row describing a difficulty report.
#[must_use]
pub fn csv_row(report: &DifficultyReport) -> String {
    format!(
        "{},{:.2}%,{}",
        report.mirror_count, report.mirror_percentage, report.total_reflections
    )
}

/// Result record of a single surveyed ray.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SurveyRecord {
    /// Door the ray entered through.
    pub entry_door: u32,
    /// Door the ray left through.
    pub exit_door: u32,
    /// Mirrors the ray bounced off.
    pub reflections: u32,
    /// Visited rooms as `[row, column]` pairs.
    pub path: Vec<[u32; 2]>,
}

impl From<&RayTrace> for SurveyRecord {
    fn from(trace: &RayTrace) -> Self {
        Self {
            entry_door: trace.entry.get(),
            exit_door: trace.exit.get(),
            reflections: trace.reflections,
            path: trace
                .path
                .iter()
                .map(|room| [room.row(), room.column()])
                .collect(),
        }
    }
}

/// Renders one line per surveyed ray.
#[must_use]
pub fn render_survey_text(traces: &[RayTrace]) -> String {
    let mut out = String::from("Path survey:\n");
    for trace in traces {
        let path = trace
            .path
            .iter()
            .map(|room| format!("({},{})", room.row(), room.column()))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            out,
            "Door {} -> {} (reflections: {}): {path}",
            trace.entry, trace.exit, trace.reflections
        );
    }
    out
}

/// Serialises the surveyed rays as a single-line JSON array.
pub fn render_survey_json(traces: &[RayTrace]) -> AnyResult<String> {
    let records: Vec<SurveyRecord> = traces.iter().map(SurveyRecord::from).collect();
    serde_json::to_string(&records).context("failed to serialise path survey")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_maze_core::{DoorNumber, ExplorationRecord, RoomCoord};

    fn grid(text: &str) -> Grid {
        text.parse().expect("grid parses")
    }

    fn report() -> DifficultyReport {
        let initial = grid("/.\n.\\");
        DifficultyReport {
            initial_config: initial.clone(),
            room_count: 4,
            mirror_count: 2,
            mirror_percentage: 50.0,
            total_reflections: 24,
            exploration_results: (1..=3)
                .map(|attempt| ExplorationRecord {
                    door: DoorNumber::new(1),
                    attempt,
                    exit_door: DoorNumber::new(4),
                    reflections: 1,
                    grid_state: initial.clone(),
                })
                .collect(),
        }
    }

    #[test]
    fn labelled_grid_numbers_every_door() {
        let rendered = LabelledGrid::new(&grid("/.\n.\\")).to_string();

        assert_eq!(
            rendered,
            "    6  5\n 7  /  .  4\n 8  .  \\  3\n    1  2"
        );
    }

    #[test]
    fn labelled_grid_matches_three_by_three_numbering() {
        let rendered = LabelledGrid::new(&grid("...\n...\n...")).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "    9  8  7");
        assert_eq!(lines[1], "10  .  .  .  6");
        assert_eq!(lines[3], "12  .  .  .  4");
        assert_eq!(lines[4], "    1  2  3");
    }

    #[test]
    fn text_summary_lists_statistics() {
        let text = render_text(&report(), false);

        assert!(text.contains("Maze size: 2x2"));
        assert!(text.contains("Rooms: 4"));
        assert!(text.contains("Mirrors: 2"));
        assert!(text.contains("Mirror share: 50.00%"));
        assert!(text.contains("Total reflections: 24"));
        assert!(!text.contains("Exploration results"));
    }

    #[test]
    fn verbose_text_lists_attempts_and_final_grid_per_door() {
        let text = render_text(&report(), true);

        assert!(text.contains("Door 1 attempt 1: exit 4 (reflections: 1)"));
        assert!(text.contains("Door 1 attempt 3: exit 4 (reflections: 1)"));
        assert_eq!(text.matches("Grid after exploration").count(), 1);
    }

    #[test]
    fn csv_row_formats_percentage() {
        assert_eq!(csv_row(&report()), "2,50.00%,24");
    }

    #[test]
    fn json_report_uses_row_strings() {
        let json = render_json(&report()).expect("serialises");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["initial_config"], serde_json::json!(["/.", ".\\"]));
        assert_eq!(value["mirror_percentage"], serde_json::json!(50.0));
        assert_eq!(value["exploration_results"][2]["attempt"], 3);
        assert_eq!(value["exploration_results"][0]["exit_door"], 4);
    }

    #[test]
    fn survey_json_lists_paths_as_pairs() {
        let traces = vec![RayTrace {
            entry: DoorNumber::new(1),
            exit: DoorNumber::new(9),
            reflections: 0,
            path: vec![
                RoomCoord::new(2, 0),
                RoomCoord::new(1, 0),
                RoomCoord::new(0, 0),
            ],
        }];

        let json = render_survey_json(&traces).expect("serialises");

        assert_eq!(
            json,
            r#"[{"entry_door":1,"exit_door":9,"reflections":0,"path":[[2,0],[1,0],[0,0]]}]"#
        );
        assert!(render_survey_text(&traces)
            .contains("Door 1 -> 9 (reflections: 0): (2,0) (1,0) (0,0)"));
    }
}
