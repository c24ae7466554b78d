#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates mirror mazes and scores their difficulty.

mod csv_output;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{
    parser::ValueSource, ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum,
};
use log::{info, warn};
use mirror_maze_core::{Command, DifficultyReport, Grid, RayTrace, StepBudget};
use mirror_maze_rendering::{
    render_json, render_survey_json, render_survey_text, render_text, SEPARATOR,
};
use mirror_maze_system_difficulty::{analyze, survey};
use mirror_maze_system_generation::{
    Config, GridGenerator, DEFAULT_HEIGHT, DEFAULT_MIRROR_PROBABILITY, DEFAULT_WIDTH,
};
use mirror_maze_world::{self as world, World};

use crate::csv_output::CsvOutput;

/// Output formats supported by the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Door-labelled grid followed by the statistics.
    Text,
    /// One JSON document per maze.
    Json,
    /// One CSV row per maze, written to a file.
    Csv,
}

/// Generates mirror mazes and measures how hard they are to escape.
#[derive(Debug, Parser)]
#[command(name = "mirror-maze", version, disable_help_flag = true)]
struct Cli {
    /// Number of columns in generated mazes.
    #[arg(short = 'w', long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,
    /// Number of rows in generated mazes.
    #[arg(short = 'h', long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,
    /// Chance that a room holds a mirror (0.0-1.0).
    #[arg(short = 'p', long, default_value_t = DEFAULT_MIRROR_PROBABILITY, value_parser = parse_probability)]
    probability: f64,
    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Number of mazes to analyse.
    #[arg(short = 'i', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,
    /// List every attempt and raise the log level.
    #[arg(short = 'v', long)]
    verbose: bool,
    /// Seed for reproducible maze generation.
    #[arg(short = 's', long)]
    seed: Option<u64>,
    /// Analyse the grid stored in FILE instead of generating one.
    #[arg(long, value_name = "FILE")]
    grid: Option<PathBuf>,
    /// Also trace every door once and print the visited rooms.
    #[arg(long)]
    survey: bool,
    /// Steps a single ray may take per room before it is abandoned.
    #[arg(long, value_name = "STEPS", default_value_t = StepBudget::DEFAULT_PER_ROOM)]
    step_budget: u32,
    /// Directory the CSV file is written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

fn parse_probability(value: &str) -> Result<f64, String> {
    let probability: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(format!("{probability} is not between 0.0 and 1.0"))
    }
}

/// Generation options that a `--grid` file takes precedence over.
const GENERATOR_OPTIONS: [&str; 4] = ["width", "height", "probability", "seed"];

fn overridden_generator_options(matches: &ArgMatches) -> Vec<&'static str> {
    if matches.value_source("grid").is_none() {
        return Vec::new();
    }
    GENERATOR_OPTIONS
        .into_iter()
        .filter(|id| matches.value_source(id) == Some(ValueSource::CommandLine))
        .collect()
}

fn warn_about_grid_file(cli: &Cli, matches: &ArgMatches) {
    let ignored = overridden_generator_options(matches);
    if !ignored.is_empty() {
        warn!("--{} ignored because --grid supplies the maze", ignored.join(", --"));
    }
    if cli.grid.is_some() && cli.iterations > 1 {
        warn!(
            "--grid analyses the same maze in each of the {} iterations",
            cli.iterations
        );
    }
}

/// Where the analysed grids come from.
enum MazeSource {
    File(Grid),
    Random(GridGenerator),
}

impl MazeSource {
    fn from_cli(cli: &Cli) -> Result<Self> {
        if let Some(path) = &cli.grid {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read grid from {}", path.display()))?;
            let grid = text
                .parse()
                .with_context(|| format!("invalid grid in {}", path.display()))?;
            return Ok(Self::File(grid));
        }

        let generator = GridGenerator::new(Config {
            width: cli.width,
            height: cli.height,
            mirror_probability: cli.probability,
            seed: cli.seed,
        })
        .context("invalid generator settings")?;
        Ok(Self::Random(generator))
    }

    fn next_command(&mut self) -> Result<Command> {
        match self {
            Self::File(grid) => Ok(Command::ConfigureGrid { grid: grid.clone() }),
            Self::Random(generator) => Ok(generator.next_command()?),
        }
    }
}

/// Report and optional path survey for one analysed maze.
struct Analysis {
    report: DifficultyReport,
    survey: Option<Vec<RayTrace>>,
}

fn analyse(grid_command: Command, budget: StepBudget, with_survey: bool) -> Result<Analysis> {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureStepBudget { budget },
        &mut events,
    );
    world::apply(&mut world, grid_command, &mut events);

    let report = analyze(&mut world)?;
    let survey = if with_survey {
        let mut fresh = World::with_grid(report.initial_config.clone());
        world::apply(
            &mut fresh,
            Command::ConfigureStepBudget { budget },
            &mut events,
        );
        Some(survey(&mut fresh)?)
    } else {
        None
    };
    Ok(Analysis { report, survey })
}

fn run(cli: &Cli) -> Result<()> {
    let mut source = MazeSource::from_cli(cli)?;
    let budget = StepBudget::per_room(cli.step_budget);
    let mut csv: Option<CsvOutput> = None;

    if cli.survey && cli.format == OutputFormat::Csv {
        warn!("the path survey is not written to CSV output");
    }

    for iteration in 1..=cli.iterations {
        let command = source.next_command()?;
        let Analysis { report, survey } = analyse(command, budget, cli.survey)
            .with_context(|| format!("failed to analyse maze {iteration}"))?;
        info!(
            "maze {iteration}: {} mirrors, {} reflections",
            report.mirror_count, report.total_reflections
        );

        match cli.format {
            OutputFormat::Text => {
                println!("\nMaze {iteration}:\n");
                print!("{}", render_text(&report, cli.verbose));
                if let Some(traces) = &survey {
                    println!();
                    print!("{}", render_survey_text(traces));
                }
                println!("\n{SEPARATOR}");
            }
            OutputFormat::Json => {
                println!("{}", render_json(&report)?);
                if let Some(traces) = &survey {
                    println!("{}", render_survey_json(traces)?);
                }
            }
            OutputFormat::Csv => {
                let output = match csv.take() {
                    Some(output) => output,
                    None => CsvOutput::create(&cli.output_dir, &report)?,
                };
                output.append(&report)?;
                csv = Some(output);
            }
        }
    }

    if let Some(output) = csv {
        println!("CSV file written: {}", output.path().display());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Entry point for the Mirror Maze command-line interface.
fn main() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|error| error.exit());
    init_logging(cli.verbose);
    warn_about_grid_file(&cli, &matches);
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mirror-maze").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    fn matches(args: &[&str]) -> ArgMatches {
        Cli::command()
            .try_get_matches_from(std::iter::once("mirror-maze").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn grid_file_overrides_explicit_generator_options() {
        let given = matches(&["--grid", "maze.txt", "-w", "5", "-s", "2"]);
        assert_eq!(overridden_generator_options(&given), vec!["width", "seed"]);

        let defaults_only = matches(&["--grid", "maze.txt"]);
        assert!(overridden_generator_options(&defaults_only).is_empty());

        let generated = matches(&["-w", "5", "-p", "0.5"]);
        assert!(overridden_generator_options(&generated).is_empty());
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = parse(&[]);

        assert_eq!(cli.width, 3);
        assert_eq!(cli.height, 3);
        assert_eq!(cli.probability, 0.3);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.iterations, 1);
        assert!(!cli.verbose);
        assert!(!cli.survey);
        assert_eq!(cli.step_budget, StepBudget::DEFAULT_PER_ROOM);
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn short_h_sets_the_height() {
        let cli = parse(&["-w", "5", "-h", "4", "-f", "json", "-i", "2", "-v"]);

        assert_eq!(cli.width, 5);
        assert_eq!(cli.height, 4);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.iterations, 2);
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_out_of_range_probability_and_zero_width() {
        let cases: [&[&str]; 3] = [&["-p", "1.5"], &["-p", "abc"], &["-w", "0"]];
        for args in cases {
            let result =
                Cli::try_parse_from(std::iter::once("mirror-maze").chain(args.iter().copied()));
            assert!(result.is_err(), "{args:?} should be rejected");
        }
    }

    #[test]
    fn seeded_runs_produce_identical_reports() {
        let cli = parse(&["-w", "4", "-h", "3", "-p", "0.5", "-s", "11"]);
        let mut first = MazeSource::from_cli(&cli).expect("source");
        let mut second = MazeSource::from_cli(&cli).expect("source");
        let budget = StepBudget::default();

        let left_grid = first.next_command().expect("grid");
        let right_grid = second.next_command().expect("grid");

        let left = analyse(left_grid, budget, true).expect("analysis");
        let right = analyse(right_grid, budget, true).expect("analysis");

        assert_eq!(left.report, right.report);
        assert_eq!(left.survey, right.survey);
        assert_eq!(left.survey.map(|traces| traces.len()), Some(14));
    }

    #[test]
    fn grid_file_is_analysed_as_given() {
        let path =
            std::env::temp_dir().join(format!("mirror-maze-grid-{}.txt", std::process::id()));
        fs::write(&path, "/\n").expect("grid written");
        let cli = parse(&["--grid", path.to_str().expect("utf-8 path")]);

        let mut source = MazeSource::from_cli(&cli).expect("source");
        let command = source.next_command().expect("grid");
        let analysis = analyse(command, StepBudget::default(), false).expect("analysis");
        fs::remove_file(&path).expect("grid removed");

        assert_eq!(analysis.report.total_reflections, 12);
        assert!(analysis.survey.is_none());
    }

    #[test]
    fn tiny_step_budget_fails_the_run() {
        let cli = parse(&["-p", "0", "--step-budget", "0", "-s", "1"]);
        let mut source = MazeSource::from_cli(&cli).expect("source");

        let result = analyse(
            source.next_command().expect("grid"),
            StepBudget::per_room(cli.step_budget),
            false,
        );

        assert!(result.is_err());
    }
}
