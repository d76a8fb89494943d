//! Chained path filter deciding which units take part in extraction.
//!
//! Each stage is applied to the subject left by the previous one. A positive
//! stage must match, and narrows the subject to its last capturing group (or to
//! the whole match when the pattern has no groups). A negated stage, written
//! with a leading `!`, must not match and leaves the subject as it is.

use regex::Regex;

use super::error::ConfigError;

/// Default stages: script suffixes, then no `node_modules` path segment.
pub const DEFAULT_MODULE_FILTER: &[&str] = &[
    r"\.(?:jsx?|ts)$",
    r"!(?:^|[\\/])node_modules(?:[\\/]|$)",
];

#[derive(Debug, Clone)]
struct Stage {
    regex: Regex,
    negated: bool,
}

#[derive(Debug, Clone)]
pub struct ModuleFilter {
    stages: Vec<Stage>,
}

impl ModuleFilter {
    /// Compile a filter chain. `\!` at the start of a stage matches a literal `!`.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let stages = patterns
            .iter()
            .map(|p| compile_stage(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stages })
    }

    pub fn accepts(&self, unit: &str) -> bool {
        let mut subject = unit;

        for stage in &self.stages {
            if stage.negated {
                if stage.regex.is_match(subject) {
                    return false;
                }
                continue;
            }

            let Some(caps) = stage.regex.captures(subject) else {
                return false;
            };
            subject = if caps.len() > 1 {
                caps.get(caps.len() - 1).map_or("", |m| m.as_str())
            } else {
                caps.get(0).map_or("", |m| m.as_str())
            };
        }

        true
    }
}

impl Default for ModuleFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_FILTER).expect("default module filter compiles")
    }
}

fn compile_stage(pattern: &str) -> Result<Stage, ConfigError> {
    let (negated, source) = if let Some(rest) = pattern.strip_prefix('!') {
        (true, rest)
    } else if pattern.starts_with(r"\!") {
        (false, &pattern[1..])
    } else {
        (false, pattern)
    };

    let regex = Regex::new(source).map_err(|error| ConfigError::InvalidModuleFilter {
        pattern: pattern.to_string(),
        error,
    })?;

    Ok(Stage { regex, negated })
}
