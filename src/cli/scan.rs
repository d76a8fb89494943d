//! Source discovery for the CLI host.
//!
//! Walks a source root, applies `ignores` and the extractor's module filter to
//! each relative path, assigns a group from the chunk rules and loads the
//! remaining files in parallel. Units come back sorted by identifier so runs
//! are deterministic.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use colored::Colorize;
use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{ChunkConfig, DEFAULT_GROUP};
use crate::core::ModuleFilter;
use crate::utils::to_unit_id;

/// Compiled chunk rules; the first rule with a matching pattern wins.
pub struct ChunkRules {
    rules: Vec<(String, Vec<Pattern>)>,
}

impl ChunkRules {
    pub fn new(chunks: &[ChunkConfig]) -> Result<Self> {
        let rules = chunks
            .iter()
            .map(|chunk| {
                let patterns = chunk
                    .include
                    .iter()
                    .map(|p| {
                        Pattern::new(p).with_context(|| {
                            format!("Invalid glob pattern in chunk \"{}\": \"{}\"", chunk.name, p)
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((chunk.name.clone(), patterns))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn group_for(&self, unit_id: &str) -> &str {
        self.rules
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.matches(unit_id)))
            .map_or(DEFAULT_GROUP, |(name, _)| name.as_str())
    }
}

/// One file ready to be handed to a run.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    /// Path relative to the source root, `/`-separated.
    pub id: String,
    pub group: String,
    pub text: String,
}

pub struct ScanResult {
    pub units: Vec<SourceUnit>,
    /// Files rejected by the module filter.
    pub filtered_count: usize,
    /// Entries that could not be accessed or read as UTF-8.
    pub skipped_count: usize,
}

pub fn scan_units(
    root: &Path,
    ignores: &[String],
    module_filter: &ModuleFilter,
    chunks: &ChunkRules,
    verbose: bool,
) -> Result<ScanResult> {
    if !root.is_dir() {
        anyhow::bail!("Source root is not a directory: {}", root.display());
    }

    let ignore_patterns = ignores
        .iter()
        .map(|p| {
            Pattern::new(p).with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", p))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut candidates: Vec<(PathBuf, String)> = Vec::new();
    let mut filtered_count = 0;
    let mut skipped_count = 0;

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), e);
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let id = to_unit_id(relative);

        if ignore_patterns.iter().any(|p| p.matches(&id)) {
            continue;
        }
        if !module_filter.accepts(&id) {
            filtered_count += 1;
            continue;
        }

        candidates.push((path.to_path_buf(), id));
    }

    let loaded: Vec<(PathBuf, String, std::io::Result<String>)> = candidates
        .into_par_iter()
        .map(|(path, id)| {
            let text = fs::read_to_string(&path);
            (path, id, text)
        })
        .collect();

    let mut units = Vec::with_capacity(loaded.len());
    for (path, id, text) in loaded {
        match text {
            Ok(text) => {
                let group = chunks.group_for(&id).to_string();
                units.push(SourceUnit {
                    path,
                    id,
                    group,
                    text,
                });
            }
            Err(e) => {
                skipped_count += 1;
                if verbose {
                    eprintln!(
                        "{} Cannot read {}: {}",
                        "warning:".bold().yellow(),
                        path.display(),
                        e
                    );
                }
            }
        }
    }

    units.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(ScanResult {
        units,
        filtered_count,
        skipped_count,
    })
}
