use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::json;

use super::super::{
    args::ExtractCommand,
    scan::{ChunkRules, scan_units},
};
use super::{CommandResult, CommandSummary, ExtractSummary, RunReport};
use crate::{
    config::load_config,
    core::{Extractor, UnitOutcome},
    output::OutputTemplate,
};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let cwd = env::current_dir().context("Failed to read current directory")?;
    extract_in(cmd, &cwd)
}

/// Run extraction with `base_dir` as the working directory.
///
/// Each root is an independent run sharing one extractor. A run with
/// extraction errors writes neither mappings nor rewritten sources.
pub fn extract_in(cmd: ExtractCommand, base_dir: &Path) -> Result<CommandResult> {
    let args = &cmd.args;
    let verbose = args.common.verbose;

    let mut config = load_config(base_dir)?.config;
    if let Some(source_root) = &args.common.source_root {
        config.source_root = source_root.to_string_lossy().into_owned();
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    if args.mangle {
        config.mangle = true;
    }

    let extractor = Extractor::new(config.to_options()).context("Invalid configuration")?;
    let chunks = ChunkRules::new(&config.chunks)?;
    let output = config.output.as_deref().map(OutputTemplate::new);

    let roots: Vec<(String, PathBuf)> = if cmd.roots.is_empty() {
        vec![(config.name.clone(), base_dir.join(&config.source_root))]
    } else {
        cmd.roots
            .iter()
            .map(|root| (run_name_for(root), base_dir.join(root)))
            .collect()
    };

    let mut runs = Vec::with_capacity(roots.len());
    let mut error_count = 0;

    for (name, root) in roots {
        let scan = scan_units(
            &root,
            &config.ignores,
            extractor.module_filter(),
            &chunks,
            verbose,
        )?;

        let mut run = extractor.begin_run(name.clone());
        let mut errors = Vec::new();
        let mut rewrites: Vec<(&Path, &str, String)> = Vec::new();

        for unit in &scan.units {
            match run.process_unit(&unit.text, &unit.id, &unit.group) {
                Ok(UnitOutcome::Rewritten(text)) => {
                    rewrites.push((unit.path.as_path(), unit.id.as_str(), text))
                }
                Ok(UnitOutcome::Skipped | UnitOutcome::Unchanged) => {}
                Err(err) => errors.push(err),
            }
        }

        let finished = run.finish(json!({
            "root": root.display().to_string(),
            "files": scan.units.len(),
        }))?;

        let mut written = Vec::new();
        if errors.is_empty() {
            if let Some(output) = &output {
                written = output.write(base_dir, &finished.result)?;
            }
            if args.apply {
                for (path, _, text) in &rewrites {
                    fs::write(path, text)
                        .with_context(|| format!("Failed to write file: {}", path.display()))?;
                }
            }
        }

        error_count += errors.len();
        runs.push(RunReport {
            name,
            root,
            result: finished.result,
            stats: finished.stats,
            errors,
            written,
            rewritten: rewrites.iter().map(|(_, id, _)| id.to_string()).collect(),
            filtered_count: scan.filtered_count,
            skipped_count: scan.skipped_count,
        });
    }

    Ok(CommandResult {
        summary: CommandSummary::Extract(ExtractSummary {
            runs,
            is_apply: args.apply,
            mangle: extractor.is_mangling(),
        }),
        error_count,
        exit_on_errors: true,
    })
}

fn run_name_for(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
