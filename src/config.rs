use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_MODULE_FILTER, ExtractorOptions, PatternSource, RewriteScope};

pub const CONFIG_FILE_NAME: &str = ".keymanglerc.json";

/// Group assigned to files that match no chunk rule.
pub const DEFAULT_GROUP: &str = "main";

/// `groupIndex` accepts a single index or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GroupIndex {
    One(usize),
    Many(Vec<usize>),
}

impl GroupIndex {
    pub fn to_vec(&self) -> Vec<usize> {
        match self {
            GroupIndex::One(index) => vec![*index],
            GroupIndex::Many(indices) => indices.clone(),
        }
    }
}

/// A named output group and the files (glob patterns relative to the source
/// root) that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChunkConfig {
    pub name: String,
    #[serde(default)]
    pub include: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_pattern: Option<PatternSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_replace: Option<String>,
    #[serde(default = "default_group_index")]
    pub group_index: GroupIndex,
    #[serde(default = "default_module_filter")]
    pub module_filter: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default)]
    pub mangle: bool,
    #[serde(default)]
    pub rewrite_scope: RewriteScope,
    /// Run name substituted for `[name]` in `output`.
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub chunks: Vec<ChunkConfig>,
}

fn default_group_index() -> GroupIndex {
    GroupIndex::Many(vec![1])
}

fn default_module_filter() -> Vec<String> {
    DEFAULT_MODULE_FILTER.iter().map(|s| s.to_string()).collect()
}

fn default_source_root() -> String {
    "./".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            function_pattern: None,
            function_replace: None,
            group_index: default_group_index(),
            module_filter: default_module_filter(),
            output: None,
            mangle: false,
            rewrite_scope: RewriteScope::default(),
            name: String::new(),
            source_root: default_source_root(),
            ignores: Vec::new(),
            chunks: Vec::new(),
        }
    }
}

impl Config {
    /// Validate host-side configuration values.
    ///
    /// Extraction options are checked separately when the extractor is built.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for chunk in &self.chunks {
            if chunk.name.is_empty() {
                bail!("Chunk names in 'chunks' must not be empty");
            }
            for pattern in &chunk.include {
                Pattern::new(pattern).with_context(|| {
                    format!(
                        "Invalid glob pattern in chunk \"{}\": \"{}\"",
                        chunk.name, pattern
                    )
                })?;
            }
        }

        Ok(())
    }

    /// Extraction options for this configuration. The completion hook is left
    /// unset; it is only available to library callers.
    pub fn to_options(&self) -> ExtractorOptions {
        ExtractorOptions {
            function_pattern: self.function_pattern.clone(),
            function_replace: self.function_replace.clone(),
            group_index: self.group_index.to_vec(),
            module_filter: Some(self.module_filter.clone()),
            mangle: self.mangle,
            rewrite_scope: self.rewrite_scope,
            done: None,
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
