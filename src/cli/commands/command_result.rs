use std::path::PathBuf;

use crate::core::{ExtractionError, RunResult, RunStats};

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub runs: Vec<RunReport>,
    pub is_apply: bool,
    pub mangle: bool,
}

/// Outcome of one run over one source root.
#[derive(Debug)]
pub struct RunReport {
    pub name: String,
    pub root: PathBuf,
    pub result: RunResult,
    pub stats: RunStats,
    pub errors: Vec<ExtractionError>,
    /// Mapping files written for this run.
    pub written: Vec<PathBuf>,
    /// Sources that were (or, in dry-run mode, would be) rewritten.
    pub rewritten: Vec<String>,
    /// Files rejected by the module filter during discovery.
    pub filtered_count: usize,
    pub skipped_count: usize,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running keymangle commands
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
}
