//! Persisting run results as JSON files.
//!
//! The output path is a template. `[name]` is replaced with the run name and
//! `[chunk]` with the sanitized group name. Without `[chunk]`, all groups are
//! merged into one file, later groups winning on key collisions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{KeyMapping, RunResult};
use crate::utils::sanitize_group_name;

pub const NAME_TOKEN: &str = "[name]";
pub const CHUNK_TOKEN: &str = "[chunk]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    template: String,
}

impl OutputTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Whether each group is written to its own file.
    pub fn splits_groups(&self) -> bool {
        self.template.contains(CHUNK_TOKEN)
    }

    pub fn path_for(&self, run_name: &str, group: Option<&str>) -> PathBuf {
        let mut path = self.template.replace(NAME_TOKEN, run_name);
        if let Some(group) = group {
            path = path.replace(CHUNK_TOKEN, &sanitize_group_name(group));
        }
        PathBuf::from(path)
    }

    /// Write `result` below `base_dir`, returning the files written.
    pub fn write(&self, base_dir: &Path, result: &RunResult) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if self.splits_groups() {
            for (group, mapping) in result.groups() {
                let path = base_dir.join(self.path_for(&result.run_name, Some(group)));
                save_mapping(&path, mapping)?;
                written.push(path);
            }
        } else {
            let path = base_dir.join(self.path_for(&result.run_name, None));
            save_mapping(&path, &result.combined())?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Save a mapping with 2-space indentation and a trailing newline.
fn save_mapping(path: &Path, mapping: &KeyMapping) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = mapping
        .to_json_pretty()
        .context("Failed to serialize key mapping")?;

    fs::write(path, format!("{}\n", content))
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), keys = mapping.len(), "wrote key mapping");
    Ok(())
}
