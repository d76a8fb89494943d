//! Report formatting and printing utilities.
//!
//! Separate from the extraction core so keymangle can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, ExtractSummary, InitSummary, RunReport};
use crate::config::CONFIG_FILE_NAME;
use crate::core::KeyMapping;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of rewritten files listed in a dry run.
const MAX_REWRITES_DISPLAY: usize = 10;

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Extract(summary) => {
            print_extract_to(summary, verbose, &mut io::stdout().lock());
        }
        CommandSummary::Init(summary) => print_init(summary),
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        eprintln!(
            "{} {} already exists",
            "error:".bold().red(),
            CONFIG_FILE_NAME
        );
    }
}

pub fn print_extract_to<W: Write>(summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    for run in &summary.runs {
        print_run(run, summary, verbose, writer);
    }
}

fn print_run<W: Write>(run: &RunReport, summary: &ExtractSummary, verbose: bool, writer: &mut W) {
    let label = run_label(run);

    for err in &run.errors {
        let _ = writeln!(writer, "{}: {}", "error".bold().red(), err);
        let _ = writeln!(writer, "  {} {}", "-->".blue(), err.unit);
    }

    if !run.errors.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}{} extraction {} - no files were written",
            FAILURE_MARK.red(),
            label,
            run.errors.len(),
            if run.errors.len() == 1 { "error" } else { "errors" }.red()
        );
        return;
    }

    if verbose {
        for (group, mapping) in run.result.groups() {
            print_group(group, mapping, writer);
        }
    }

    for path in &run.written {
        let _ = writeln!(writer, "{} {}", "Wrote".green().bold(), path.display());
    }

    if !run.rewritten.is_empty() {
        print_rewrites(&run.rewritten, summary.is_apply, writer);
    }

    let files = run.stats.units_extracted;
    let keys = run.result.key_count();
    let groups = run.result.group_count();
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "{}{} {} {} in {} {} from {} {}",
            label,
            if summary.mangle { "Mangled" } else { "Extracted" },
            keys,
            if keys == 1 { "key" } else { "keys" },
            groups,
            if groups == 1 { "group" } else { "groups" },
            files,
            if files == 1 { "file" } else { "files" }
        )
        .green()
    );

    if verbose && run.skipped_count > 0 {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be read",
            "warning:".bold().yellow(),
            run.skipped_count
        );
    }
}

fn print_group<W: Write>(group: &str, mapping: &KeyMapping, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} ({} {})",
        "group".bold(),
        group.cyan(),
        mapping.len(),
        if mapping.len() == 1 { "key" } else { "keys" }
    );

    let width = mapping
        .iter()
        .map(|(assigned, _)| UnicodeWidthStr::width(assigned))
        .max()
        .unwrap_or(0);

    for (assigned, original) in mapping.iter() {
        let padding = width - UnicodeWidthStr::width(assigned);
        let _ = writeln!(
            writer,
            "  {}{:padding$} {} {}",
            assigned,
            "",
            "=".blue(),
            original,
            padding = padding
        );
    }
}

fn print_rewrites<W: Write>(rewritten: &[String], is_apply: bool, writer: &mut W) {
    if is_apply {
        let _ = writeln!(
            writer,
            "{} {} file(s)",
            "Rewrote".green().bold(),
            rewritten.len()
        );
        return;
    }

    let _ = writeln!(
        writer,
        "{} {} file(s) (use {} to write changes):",
        "Would rewrite".yellow().bold(),
        rewritten.len(),
        "--apply".cyan()
    );
    for id in rewritten.iter().take(MAX_REWRITES_DISPLAY) {
        let _ = writeln!(writer, "  {}", id);
    }
    let remaining = rewritten.len().saturating_sub(MAX_REWRITES_DISPLAY);
    if remaining > 0 {
        let _ = writeln!(writer, "  {}", format!("(and {} more)", remaining).dimmed());
    }
}

fn run_label(run: &RunReport) -> String {
    if run.name.is_empty() {
        String::new()
    } else {
        format!("[{}] ", run.name)
    }
}
