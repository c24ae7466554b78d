//! CSV file that accumulates one row per analysed maze.

use std::{
    fs::{self, OpenOptions},
    io::Write as _,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use mirror_maze_core::DifficultyReport;
use mirror_maze_rendering::{csv_row, CSV_HEADER};

/// CSV file created for the first report and appended to afterwards.
#[derive(Debug)]
pub(crate) struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    /// Creates the file inside `directory`, named after the first report, and writes the header.
    pub(crate) fn create(directory: &Path, first: &DifficultyReport) -> Result<Self> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is set before the unix epoch")?
            .as_secs();
        let path = directory.join(file_name(first, timestamp));
        fs::write(&path, format!("{CSV_HEADER}\n"))
            .with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self { path })
    }

    /// Appends the row describing `report`.
    pub(crate) fn append(&self, report: &DifficultyReport) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{}", csv_row(report))
            .with_context(|| format!("failed to append to {}", self.path.display()))
    }

    /// Location of the file.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

fn file_name(report: &DifficultyReport, timestamp: u64) -> String {
    let grid = &report.initial_config;
    format!(
        "maze-analyzer-{}x{}-{}-{timestamp}.csv",
        grid.width(),
        grid.height(),
        report.room_count
    )
}
